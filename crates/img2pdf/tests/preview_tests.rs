use image::{DynamicImage, Rgb, RgbImage};
use img2pdf::{Document, PreviewCache, THUMBNAIL_SIZE};
use tempfile::tempdir;

fn page(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([60, 60, 220])))
}

#[test]
fn empty_page_list_has_nothing_to_preview() {
    let doc = Document::new();
    let mut cache = PreviewCache::in_memory();
    assert!(cache.thumbnail(&doc, 0).unwrap().is_none());
    assert!(cache.is_empty());
}

#[test]
fn thumbnail_fits_the_display_box_and_keeps_aspect() {
    let mut doc = Document::new();
    doc.add_decoded("wide.png", vec![page(600, 300)]);
    doc.add_all_pages(0).unwrap();

    let mut cache = PreviewCache::in_memory();
    let thumb = cache.thumbnail(&doc, 0).unwrap().unwrap();

    assert_eq!((thumb.width, thumb.height), (THUMBNAIL_SIZE, 150));
    assert!(!thumb.jpeg.is_empty());
}

#[test]
fn thumbnails_are_computed_once_per_file_page_pair() {
    let mut doc = Document::new();
    doc.add_decoded("a.png", vec![page(400, 400)]);
    doc.add_all_pages(0).unwrap();
    doc.duplicate_page(0).unwrap();

    let mut cache = PreviewCache::in_memory();
    let first = cache.thumbnail(&doc, 0).unwrap().unwrap().jpeg.clone();
    // The duplicate aliases the same (file, page) pair.
    let second = cache.thumbnail(&doc, 1).unwrap().unwrap().jpeg.clone();

    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);
}

#[test]
fn distinct_files_do_not_collide() {
    let mut doc = Document::new();
    doc.add_decoded("a.png", vec![page(400, 200)]);
    doc.add_decoded("b.png", vec![page(200, 400)]);
    doc.add_page(0, 0).unwrap();
    doc.add_page(1, 0).unwrap();

    let mut cache = PreviewCache::in_memory();
    let a = cache.thumbnail(&doc, 0).unwrap().unwrap().width;
    let b = cache.thumbnail(&doc, 1).unwrap().unwrap().width;

    assert_eq!(cache.len(), 2);
    assert_eq!(a, 300);
    assert_eq!(b, 150);
}

#[test]
fn spill_dir_is_cleared_at_session_start() {
    let dir = tempdir().unwrap();
    let stale = dir.path().join("9999_0.jpg");
    std::fs::write(&stale, b"stale thumbnail").unwrap();

    let cache = PreviewCache::with_spill_dir(dir.path()).unwrap();
    assert!(!stale.exists());
    drop(cache);
}

#[test]
fn thumbnails_spill_to_disk_and_cascade_with_their_file() {
    let dir = tempdir().unwrap();

    let mut doc = Document::new();
    let id = doc.add_decoded("a.png", vec![page(350, 350)]);
    doc.add_all_pages(0).unwrap();

    let mut cache = PreviewCache::with_spill_dir(dir.path()).unwrap();
    cache.thumbnail(&doc, 0).unwrap().unwrap();

    let spilled = cache.spill_path(id, 0).unwrap();
    assert!(spilled.exists());

    doc.remove_file(0).unwrap();
    cache.remove_file(id);
    assert!(cache.is_empty());
    assert!(!spilled.exists());
}

#[test]
fn dropping_the_cache_clears_spilled_files() {
    let dir = tempdir().unwrap();

    let mut doc = Document::new();
    let id = doc.add_decoded("a.png", vec![page(310, 310)]);
    doc.add_all_pages(0).unwrap();

    let spilled = {
        let mut cache = PreviewCache::with_spill_dir(dir.path()).unwrap();
        cache.thumbnail(&doc, 0).unwrap().unwrap();
        cache.spill_path(id, 0).unwrap()
    };

    assert!(!spilled.exists());
}

#[test]
fn small_sources_are_not_upscaled() {
    let mut doc = Document::new();
    doc.add_decoded("tiny.png", vec![page(40, 20)]);
    doc.add_all_pages(0).unwrap();

    let mut cache = PreviewCache::in_memory();
    let thumb = cache.thumbnail(&doc, 0).unwrap().unwrap();
    assert_eq!((thumb.width, thumb.height), (40, 20));
}
