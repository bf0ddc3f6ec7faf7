use crate::import;
use crate::options::ImportOptions;
use crate::types::{AssembleError, Result};
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// Handle to an imported file, minted by the [`Document`].
///
/// Page references and thumbnail cache keys carry this id instead of a raw
/// reference, so cascade-delete cannot leave anything dangling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(pub u64);

/// One imported source file and its eagerly decoded page images.
#[derive(Debug)]
pub struct FileEntry {
    id: FileId,
    path: PathBuf,
    extension: String,
    pages: Vec<DynamicImage>,
}

impl FileEntry {
    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lower-cased file suffix the decode strategy was chosen by.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Option<&DynamicImage> {
        self.pages.get(index)
    }
}

/// One slot in the output sequence: a page of an imported file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRef {
    pub file: FileId,
    pub page_index: usize,
}

/// The in-memory document: imported files plus the ordered page list that
/// defines the export order.
#[derive(Debug, Default)]
pub struct Document {
    files: Vec<FileEntry>,
    pages: Vec<PageRef>,
    next_file_id: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn pages(&self) -> &[PageRef] {
        &self.pages
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of slots in the output sequence, not of decoded source pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn file(&self, id: FileId) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn page_at(&self, index: usize) -> Option<&PageRef> {
        self.pages.get(index)
    }

    /// Look a page reference up to its decoded image.
    pub fn resolve(&self, page: &PageRef) -> Option<&DynamicImage> {
        self.file(page.file).and_then(|f| f.page(page.page_index))
    }

    /// Decode a file and append it to the file list.
    ///
    /// Unsupported extensions, missing paths and directories fail with
    /// [`AssembleError::InvalidFile`] before any decode work; nothing is
    /// appended on failure.
    pub async fn import_file(
        &mut self,
        path: impl AsRef<Path>,
        options: &ImportOptions,
    ) -> Result<FileId> {
        let path = path.as_ref();
        let pages = import::load_pages(path, options).await?;
        log::info!("imported {} ({} pages)", path.display(), pages.len());
        Ok(self.add_decoded(path, pages))
    }

    /// Append an already-decoded file. This is the storage seam
    /// [`Document::import_file`] feeds; callers that decode elsewhere can
    /// use it directly.
    pub fn add_decoded(&mut self, path: impl Into<PathBuf>, pages: Vec<DynamicImage>) -> FileId {
        let path = path.into();
        let id = FileId(self.next_file_id);
        self.next_file_id += 1;
        self.files.push(FileEntry {
            id,
            extension: import::extension_of(&path),
            path,
            pages,
        });
        id
    }

    /// Append one page reference per page of the selected file, in
    /// ascending page order. Returns the number of slots appended.
    pub fn add_all_pages(&mut self, file_index: usize) -> Result<usize> {
        let entry = self
            .files
            .get(file_index)
            .ok_or(AssembleError::NoSelection)?;
        let file = entry.id;
        let count = entry.pages.len();
        for page_index in 0..count {
            self.pages.push(PageRef { file, page_index });
        }
        Ok(count)
    }

    /// Append a single page reference. An out-of-range page index is
    /// dropped silently and reported as `Ok(false)`.
    pub fn add_page(&mut self, file_index: usize, page_index: usize) -> Result<bool> {
        let entry = self
            .files
            .get(file_index)
            .ok_or(AssembleError::NoSelection)?;
        if page_index >= entry.pages.len() {
            log::debug!(
                "page {} out of range for {} ({} pages), ignored",
                page_index,
                entry.path.display(),
                entry.pages.len()
            );
            return Ok(false);
        }
        self.pages.push(PageRef {
            file: entry.id,
            page_index,
        });
        Ok(true)
    }

    /// Remove a file and cascade-delete every page reference to it,
    /// preserving the relative order of the survivors.
    pub fn remove_file(&mut self, file_index: usize) -> Result<FileId> {
        if file_index >= self.files.len() {
            return Err(AssembleError::NoSelection);
        }
        let entry = self.files.remove(file_index);
        let before = self.pages.len();
        self.pages.retain(|p| p.file != entry.id);
        log::info!(
            "removed {} and {} page slot(s)",
            entry.path.display(),
            before - self.pages.len()
        );
        Ok(entry.id)
    }

    /// Remove one slot from the page list. Returns the index the selection
    /// should move to (the previous slot, floor 0).
    pub fn remove_page(&mut self, index: usize) -> Result<usize> {
        if index >= self.pages.len() {
            return Err(AssembleError::NoSelection);
        }
        self.pages.remove(index);
        Ok(index.saturating_sub(1))
    }

    /// Swap a slot with the one before it. No-op at the top of the list.
    /// Returns the moved slot's new index.
    pub fn move_page_up(&mut self, index: usize) -> Result<usize> {
        if index >= self.pages.len() {
            return Err(AssembleError::NoSelection);
        }
        if index == 0 {
            return Ok(0);
        }
        self.pages.swap(index - 1, index);
        Ok(index - 1)
    }

    /// Swap a slot with the one after it. No-op at the bottom of the list.
    /// Returns the moved slot's new index.
    pub fn move_page_down(&mut self, index: usize) -> Result<usize> {
        if index >= self.pages.len() {
            return Err(AssembleError::NoSelection);
        }
        if index == self.pages.len() - 1 {
            return Ok(index);
        }
        self.pages.swap(index, index + 1);
        Ok(index + 1)
    }

    /// Insert an alias of the slot at `index` (same file, same page)
    /// immediately before it. Returns the index the selection should move
    /// to, which is where the original now sits.
    pub fn duplicate_page(&mut self, index: usize) -> Result<usize> {
        if index >= self.pages.len() {
            return Err(AssembleError::NoSelection);
        }
        let copy = self.pages[index];
        self.pages.insert(index, copy);
        Ok(index + 1)
    }
}
