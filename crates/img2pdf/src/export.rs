//! Export: assemble the ordered page list into a single PDF.

use crate::document::{Document, FileId};
use crate::options::ExportOptions;
use crate::types::{AssembleError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use lopdf::{Dictionary, Object, ObjectId, Stream};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

struct EncodedPage {
    jpeg: Vec<u8>,
    width: u32,
    height: u32,
}

/// Write every slot of the page list, in order, as one page of a new PDF.
///
/// Fails with [`AssembleError::EmptyDocument`] before touching the
/// filesystem when the page list is empty. A missing `.pdf` suffix is
/// appended; the path actually written is returned.
pub async fn export_pdf(
    document: &Document,
    path: impl AsRef<Path>,
    options: &ExportOptions,
) -> Result<PathBuf> {
    if document.page_count() == 0 {
        return Err(AssembleError::EmptyDocument);
    }
    options.validate()?;
    let path = normalize_output_path(path.as_ref());

    // Deduplicate source images: aliased slots share one embedded XObject.
    let mut unique: Vec<DynamicImage> = Vec::new();
    let mut index_of: HashMap<(FileId, usize), usize> = HashMap::new();
    let mut slots: Vec<usize> = Vec::with_capacity(document.page_count());
    for (index, page) in document.pages().iter().enumerate() {
        let key = (page.file, page.page_index);
        let unique_index = match index_of.get(&key) {
            Some(&i) => i,
            None => {
                let image = document
                    .resolve(page)
                    .ok_or(AssembleError::DanglingPage { index })?;
                unique.push(image.clone());
                index_of.insert(key, unique.len() - 1);
                unique.len() - 1
            }
        };
        slots.push(unique_index);
    }

    let quality = options.quality;
    let optimize = options.optimize;

    // Encoding and assembly are CPU-bound, spawn blocking
    let bytes = tokio::task::spawn_blocking(move || {
        let encoded = unique
            .iter()
            .map(|image| encode_jpeg(image, quality))
            .collect::<Result<Vec<_>>>()?;
        assemble(&encoded, &slots, optimize)
    })
    .await??;

    tokio::fs::write(&path, bytes).await?;
    log::info!(
        "exported {} page(s) to {}",
        document.page_count(),
        path.display()
    );
    Ok(path)
}

fn normalize_output_path(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => path.to_owned(),
        _ => {
            let mut name = path.as_os_str().to_owned();
            name.push(".pdf");
            PathBuf::from(name)
        }
    }
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<EncodedPage> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, quality);
    encoder.encode_image(&rgb)?;
    Ok(EncodedPage {
        jpeg,
        width,
        height,
    })
}

/// Build the PDF object tree: one image XObject per unique source page,
/// one output page per slot. Page size in points equals pixel size
/// (72 dpi).
fn assemble(pages: &[EncodedPage], slots: &[usize], optimize: bool) -> Result<Vec<u8>> {
    let mut doc = lopdf::Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let xobject_ids: Vec<ObjectId> = pages
        .iter()
        .map(|page| {
            let dict = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"XObject".to_vec())),
                ("Subtype", Object::Name(b"Image".to_vec())),
                ("Width", Object::Integer(page.width as i64)),
                ("Height", Object::Integer(page.height as i64)),
                ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
                ("BitsPerComponent", Object::Integer(8)),
                ("Filter", Object::Name(b"DCTDecode".to_vec())),
            ]);
            doc.add_object(Stream::new(dict, page.jpeg.clone()))
        })
        .collect();

    let mut kids = Vec::new();
    for &slot in slots {
        let page = &pages[slot];
        let content = format!("q {} 0 0 {} 0 0 cm /Im0 Do Q", page.width, page.height);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let resources = Dictionary::from_iter(vec![(
            "XObject",
            Object::Dictionary(Dictionary::from_iter(vec![(
                "Im0",
                Object::Reference(xobject_ids[slot]),
            )])),
        )]);

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(page.width as i64),
                    Object::Integer(page.height as i64),
                ]),
            ),
            ("Resources", Object::Dictionary(resources)),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(slots.len() as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    if optimize {
        doc.compress();
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}
