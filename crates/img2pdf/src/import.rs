//! File import: extension validity plus decode into page images.

use crate::options::ImportOptions;
use crate::types::{AssembleError, Result};
use image::DynamicImage;
use std::path::Path;

#[cfg(feature = "pdf-import")]
use pdfium_render::prelude::*;

/// Extensions the importer accepts, matched on the lower-cased suffix.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "webp", "gif", "png", "pdf"];

pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Whether the path's extension is one the importer can decode.
pub fn is_supported(path: impl AsRef<Path>) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension_of(path.as_ref()).as_str())
}

/// Decode a file into its page images: one image for raster formats, one
/// per page for PDF input, all rendered up front.
pub async fn load_pages(
    path: impl AsRef<Path>,
    options: &ImportOptions,
) -> Result<Vec<DynamicImage>> {
    let path = path.as_ref().to_owned();
    if !path.is_file() || !is_supported(&path) {
        return Err(AssembleError::InvalidFile(path));
    }
    options.validate()?;

    let bytes = tokio::fs::read(&path).await?;
    let extension = extension_of(&path);
    let zoom = options.zoom;

    // Decoding is CPU-bound, spawn blocking
    let pages = tokio::task::spawn_blocking(move || {
        if extension == "pdf" {
            rasterize_pdf(&path, &bytes, zoom)
        } else {
            decode_image(&path, &bytes)
        }
    })
    .await??;

    Ok(pages)
}

fn decode_image(path: &Path, bytes: &[u8]) -> Result<Vec<DynamicImage>> {
    let image = image::load_from_memory(bytes).map_err(|e| AssembleError::DecodeFailed {
        path: path.to_owned(),
        message: e.to_string(),
    })?;
    Ok(vec![image])
}

/// Initialize Pdfium, trying the vendored library first, then falling back to system
#[cfg(feature = "pdf-import")]
pub fn init_pdfium() -> std::result::Result<Pdfium, PdfiumError> {
    let vendor_path = std::env::current_dir().ok().and_then(|mut p| {
        p.push("vendor/pdfium/lib");
        if p.exists() { Some(p) } else { None }
    });

    if let Some(vendor_path) = vendor_path {
        if let Ok(binding) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor_path))
        {
            return Ok(Pdfium::new(binding));
        }
    }

    Pdfium::bind_to_system_library().map(Pdfium::new)
}

#[cfg(feature = "pdf-import")]
fn rasterize_pdf(path: &Path, bytes: &[u8], zoom: f32) -> Result<Vec<DynamicImage>> {
    let decode_err = |message: String| AssembleError::DecodeFailed {
        path: path.to_owned(),
        message,
    };

    let pdfium = init_pdfium().map_err(|e| decode_err(e.to_string()))?;
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| decode_err(e.to_string()))?;

    let mut pages = Vec::new();
    for page in document.pages().iter() {
        let target_width = ((page.width().value * zoom).round() as i32).max(1);
        let config = PdfRenderConfig::new().set_target_width(target_width);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| decode_err(e.to_string()))?;
        let width = bitmap.width() as u32;
        let height = bitmap.height() as u32;
        let rgba = bitmap.as_rgba_bytes().to_vec();
        let buffer = image::RgbaImage::from_raw(width, height, rgba)
            .ok_or_else(|| decode_err("pdfium returned a malformed bitmap".to_string()))?;
        pages.push(DynamicImage::ImageRgba8(buffer));
    }
    Ok(pages)
}

#[cfg(not(feature = "pdf-import"))]
fn rasterize_pdf(path: &Path, _bytes: &[u8], _zoom: f32) -> Result<Vec<DynamicImage>> {
    Err(AssembleError::DecodeFailed {
        path: path.to_owned(),
        message: "built without PDF import support".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn extension_is_lower_cased() {
        assert_eq!(extension_of(&PathBuf::from("scan.PNG")), "png");
        assert_eq!(extension_of(&PathBuf::from("a/b/report.Pdf")), "pdf");
        assert_eq!(extension_of(&PathBuf::from("noext")), "");
    }

    #[test]
    fn supported_extensions() {
        for name in ["a.jpg", "a.jpeg", "a.webp", "a.gif", "a.png", "a.pdf"] {
            assert!(is_supported(name), "{name} should be supported");
        }
        assert!(!is_supported("a.tiff"));
        assert!(!is_supported("a.txt"));
        assert!(!is_supported("a"));
    }
}
