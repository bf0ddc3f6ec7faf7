use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("not a usable input file: {}", .0.display())]
    InvalidFile(PathBuf),
    #[error("no file or page selected")]
    NoSelection,
    #[error("document has no pages to export")]
    EmptyDocument,
    #[error("failed to decode {}: {message}", path.display())]
    DecodeFailed { path: PathBuf, message: String },
    #[error("page {index} references a missing file")]
    DanglingPage { index: usize },
    #[error("failed to encode page image: {0}")]
    EncodeFailed(#[from] image::ImageError),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, AssembleError>;
