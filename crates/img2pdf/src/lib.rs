//! Assemble a PDF from pages drawn out of image files and existing PDFs.
//!
//! The [`Document`] owns imported files (each decoded into page images) and
//! an ordered list of page references; the order of that list is the order
//! of the exported PDF.

mod document;
mod export;
mod import;
mod options;
mod preview;
mod types;

pub use document::{Document, FileEntry, FileId, PageRef};
pub use export::export_pdf;
#[cfg(feature = "pdf-import")]
pub use import::init_pdfium;
pub use import::{is_supported, load_pages, SUPPORTED_EXTENSIONS};
pub use options::{ExportOptions, ImportOptions};
pub use preview::{PreviewCache, Thumbnail, THUMBNAIL_SIZE};
pub use types::{AssembleError, Result};
