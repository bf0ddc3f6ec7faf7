//! Preview thumbnails, memoized per (file, page) pair.

use crate::document::{Document, FileId};
use crate::types::Result;
use image::codecs::jpeg::JpegEncoder;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Bounding box (square) for preview thumbnails.
pub const THUMBNAIL_SIZE: u32 = 300;

const THUMBNAIL_JPEG_QUALITY: u8 = 80;

/// A JPEG-encoded preview of one page.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Session-scoped thumbnail cache keyed by `(FileId, page_index)`.
///
/// Each key is computed at most once. With a spill directory, thumbnails
/// are additionally written as `{file_id}_{page_index}.jpg`; the directory
/// is cleared of stale files when the cache is created and again when it
/// is dropped.
#[derive(Debug, Default)]
pub struct PreviewCache {
    thumbs: HashMap<(FileId, usize), Thumbnail>,
    spill_dir: Option<PathBuf>,
}

impl PreviewCache {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_spill_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                fs::remove_file(entry.path())?;
            }
        }
        Ok(Self {
            thumbs: HashMap::new(),
            spill_dir: Some(dir),
        })
    }

    /// Thumbnail for the selected slot of the page list.
    ///
    /// `Ok(None)` means there is nothing to preview (empty page list or
    /// out-of-range selection); callers clear their preview display.
    pub fn thumbnail(
        &mut self,
        document: &Document,
        page_index: usize,
    ) -> Result<Option<&Thumbnail>> {
        let Some(page) = document.page_at(page_index) else {
            return Ok(None);
        };
        let key = (page.file, page.page_index);

        if !self.thumbs.contains_key(&key) {
            let Some(image) = document.resolve(page) else {
                return Ok(None);
            };
            // Downscale-only: sources smaller than the display box stay as-is.
            let scaled = if image.width() > THUMBNAIL_SIZE || image.height() > THUMBNAIL_SIZE {
                image.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE)
            } else {
                image.clone()
            };
            let mut jpeg = Vec::new();
            let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, THUMBNAIL_JPEG_QUALITY);
            encoder.encode_image(&scaled.to_rgb8())?;

            if let Some(dir) = &self.spill_dir {
                fs::write(dir.join(spill_name(key.0, key.1)), &jpeg)?;
            }
            self.thumbs.insert(
                key,
                Thumbnail {
                    width: scaled.width(),
                    height: scaled.height(),
                    jpeg,
                },
            );
        }

        Ok(self.thumbs.get(&key))
    }

    /// On-disk location of a spilled thumbnail, if a spill directory is set.
    pub fn spill_path(&self, file: FileId, page_index: usize) -> Option<PathBuf> {
        self.spill_dir
            .as_ref()
            .map(|dir| dir.join(spill_name(file, page_index)))
    }

    /// Drop every cached thumbnail of a removed file.
    pub fn remove_file(&mut self, file: FileId) {
        let removed: Vec<_> = self
            .thumbs
            .keys()
            .filter(|(id, _)| *id == file)
            .copied()
            .collect();
        for key in removed {
            self.thumbs.remove(&key);
            self.unlink(key);
        }
    }

    pub fn clear(&mut self) {
        let keys: Vec<_> = self.thumbs.keys().copied().collect();
        for key in keys {
            self.unlink(key);
        }
        self.thumbs.clear();
    }

    pub fn len(&self) -> usize {
        self.thumbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thumbs.is_empty()
    }

    fn unlink(&self, key: (FileId, usize)) {
        if let Some(path) = self.spill_path(key.0, key.1) {
            if let Err(e) = fs::remove_file(&path) {
                log::warn!("could not remove spilled thumbnail {}: {}", path.display(), e);
            }
        }
    }
}

impl Drop for PreviewCache {
    fn drop(&mut self) {
        self.clear();
    }
}

fn spill_name(file: FileId, page_index: usize) -> String {
    format!("{}_{}.jpg", file.0, page_index)
}
