use std::collections::HashMap;
use std::fmt;

use iced::widget::image::Handle;

/// A file chosen in the picker, read fully into memory.
///
/// This is the payload carried by the file-selection message before the
/// file joins the collection.
#[derive(Clone)]
pub struct PickedFile {
    /// Display name of the source file (e.g. "IMG_0001.jpg")
    pub file_name: String,
    /// Raw file contents
    pub data: Vec<u8>,
}

impl fmt::Debug for PickedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickedFile")
            .field("file_name", &self.file_name)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Identifier of a preview handle inside the [`PreviewPool`].
pub type PreviewId = u64;

/// Ownership table for preview resources.
///
/// Every entry in the collection owns exactly one preview handle, keyed by
/// id. `acquire` and `release` must stay strictly paired: each removal path
/// releases the entry's preview exactly once, so a preview can never
/// outlive its entry.
pub struct PreviewPool {
    handles: HashMap<PreviewId, Handle>,
    next_id: PreviewId,
}

impl PreviewPool {
    fn new() -> Self {
        PreviewPool {
            handles: HashMap::new(),
            next_id: 0,
        }
    }

    /// Allocate a fresh preview handle from image bytes.
    ///
    /// The bytes are decoded lazily by the renderer, so acquisition itself
    /// is cheap and never fails.
    pub fn acquire(&mut self, data: Vec<u8>) -> PreviewId {
        let id = self.next_id;
        self.next_id += 1;
        self.handles.insert(id, Handle::from_bytes(data));
        id
    }

    /// Release a previously acquired handle.
    pub fn release(&mut self, id: PreviewId) {
        let released = self.handles.remove(&id);
        debug_assert!(released.is_some(), "preview {id} released twice");
    }

    pub fn get(&self, id: PreviewId) -> Option<&Handle> {
        self.handles.get(&id)
    }

    /// Number of live preview handles
    pub fn len(&self) -> usize {
        self.handles.len()
    }
}

/// One selected, not-yet-converted image.
pub struct PendingImage {
    /// Display name of the source file
    pub file_name: String,
    /// Raw source bytes, handed to the conversion run unchanged
    pub data: Vec<u8>,
    /// Preview handle owned by this entry
    preview: PreviewId,
}

impl fmt::Debug for PendingImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingImage")
            .field("file_name", &self.file_name)
            .field("bytes", &self.data.len())
            .field("preview", &self.preview)
            .finish()
    }
}

/// The ordered collection of images waiting to be converted.
///
/// Entries keep their selection order; identity is positional. All
/// mutation goes through `add_files`, `remove_at` and `clear_all` so the
/// preview pool stays in lockstep with the entry list.
pub struct ImageCollection {
    entries: Vec<PendingImage>,
    previews: PreviewPool,
}

impl ImageCollection {
    pub fn new() -> Self {
        ImageCollection {
            entries: Vec::new(),
            previews: PreviewPool::new(),
        }
    }

    /// Append picked files to the end of the collection, preserving the
    /// order they were picked in. Selecting the same file twice yields two
    /// independent entries.
    pub fn add_files(&mut self, files: Vec<PickedFile>) {
        for file in files {
            let preview = self.previews.acquire(file.data.clone());
            self.entries.push(PendingImage {
                file_name: file.file_name,
                data: file.data,
                preview,
            });
        }
        debug_assert_eq!(self.entries.len(), self.previews.len());
    }

    /// Remove the entry at `index`, releasing its preview.
    ///
    /// Later entries shift down by one position. An out-of-range index is
    /// a caller bug and panics.
    pub fn remove_at(&mut self, index: usize) {
        let entry = self.entries.remove(index);
        self.previews.release(entry.preview);
        debug_assert_eq!(self.entries.len(), self.previews.len());
    }

    /// Release every preview and empty the collection. Calling this on an
    /// empty collection is a no-op.
    pub fn clear_all(&mut self) {
        for entry in self.entries.drain(..) {
            self.previews.release(entry.preview);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingImage> {
        self.entries.iter()
    }

    /// Preview handle for an entry, for display only.
    pub fn preview_of(&self, entry: &PendingImage) -> Option<&Handle> {
        self.previews.get(entry.preview)
    }

    /// Number of live preview handles. Always equals `len()`.
    pub fn preview_count(&self) -> usize {
        self.previews.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picked(name: &str) -> PickedFile {
        PickedFile {
            file_name: name.to_string(),
            data: format!("bytes of {name}").into_bytes(),
        }
    }

    fn names(collection: &ImageCollection) -> Vec<&str> {
        collection
            .iter()
            .map(|entry| entry.file_name.as_str())
            .collect()
    }

    #[test]
    fn add_files_appends_in_selection_order() {
        let mut collection = ImageCollection::new();
        collection.add_files(vec![picked("a.jpg"), picked("b.png")]);
        collection.add_files(vec![picked("c.jpeg")]);

        assert_eq!(names(&collection), ["a.jpg", "b.png", "c.jpeg"]);
        assert_eq!(collection.preview_count(), 3);
    }

    #[test]
    fn duplicate_selection_yields_two_entries() {
        let mut collection = ImageCollection::new();
        collection.add_files(vec![picked("same.jpg"), picked("same.jpg")]);

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.preview_count(), 2);
    }

    #[test]
    fn remove_at_shifts_later_entries_down() {
        let mut collection = ImageCollection::new();
        collection.add_files(vec![picked("a.jpg"), picked("b.jpg"), picked("c.jpg")]);

        collection.remove_at(1);

        assert_eq!(names(&collection), ["a.jpg", "c.jpg"]);
        assert_eq!(collection.preview_count(), 2);
    }

    #[test]
    fn remove_at_releases_exactly_one_preview() {
        let mut collection = ImageCollection::new();
        collection.add_files(vec![picked("a.jpg"), picked("b.jpg")]);
        let before = collection.preview_count();

        collection.remove_at(0);

        assert_eq!(collection.preview_count(), before - 1);
    }

    #[test]
    fn clear_all_releases_every_preview_and_is_idempotent() {
        let mut collection = ImageCollection::new();
        collection.add_files(vec![picked("a.jpg"), picked("b.jpg"), picked("c.jpg")]);

        collection.clear_all();
        assert!(collection.is_empty());
        assert_eq!(collection.preview_count(), 0);

        // Second clear on an already empty collection is a no-op.
        collection.clear_all();
        assert!(collection.is_empty());
        assert_eq!(collection.preview_count(), 0);
    }

    #[test]
    fn previews_stay_in_lockstep_with_entries() {
        let mut collection = ImageCollection::new();
        collection.add_files(vec![picked("a.jpg"), picked("b.jpg"), picked("c.jpg")]);
        collection.remove_at(2);
        collection.add_files(vec![picked("d.jpg")]);

        assert_eq!(collection.len(), collection.preview_count());
        for entry in collection.iter() {
            assert!(collection.preview_of(entry).is_some());
        }
    }

    #[test]
    #[should_panic]
    fn remove_at_out_of_range_panics() {
        let mut collection = ImageCollection::new();
        collection.add_files(vec![picked("a.jpg")]);
        collection.remove_at(5);
    }
}
