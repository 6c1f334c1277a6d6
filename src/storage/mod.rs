//! In-memory tag storage for tests and embedders without a database.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::core::errors::PipelineResult;
use crate::core::traits::TagStore;
use crate::domain::tag::{DocumentId, TagGroup};

type TagMap = HashMap<DocumentId, Vec<TagGroup>>;

/// A process-local [`TagStore`] backed by a locked map.
///
/// Replacement is a single map insert under the write lock, so a reader
/// observes either the previous tag set for a document or the new one,
/// never a partial state.
#[derive(Debug, Default)]
pub struct InMemoryTagStore {
    tags: RwLock<TagMap>,
}

impl InMemoryTagStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the tags stored for `document`.
    pub fn tags_for(&self, document: DocumentId) -> Vec<TagGroup> {
        self.read_map()
            .get(&document)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of documents with a stored tag set.
    pub fn document_count(&self) -> usize {
        self.read_map().len()
    }

    fn read_map(&self) -> RwLockReadGuard<'_, TagMap> {
        self.tags.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_map(&self) -> RwLockWriteGuard<'_, TagMap> {
        self.tags.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TagStore for InMemoryTagStore {
    fn replace_document_tags(
        &self,
        document: DocumentId,
        groups: Vec<TagGroup>,
    ) -> PipelineResult<()> {
        debug!(document = %document, tags = groups.len(), "replacing document tags");
        self.write_map().insert(document, groups);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tag::Tag;
    use crate::processors::geometry::Rect;
    use std::sync::Arc;

    fn group(text: &str) -> TagGroup {
        TagGroup {
            tag: Tag {
                text: text.to_string(),
                bbox: Rect::new(0.0, 0.0, 10.0, 10.0),
                confidence: 0.9,
                equipment_tag: false,
            },
            members: Vec::new(),
        }
    }

    #[test]
    fn test_missing_document_has_no_tags() {
        let store = InMemoryTagStore::new();
        assert!(store.tags_for(DocumentId(1)).is_empty());
        assert_eq!(store.document_count(), 0);
    }

    #[test]
    fn test_replacement_supersedes_previous_tags() {
        let store = InMemoryTagStore::new();
        let document = DocumentId(1);
        store
            .replace_document_tags(document, vec![group("A"), group("B")])
            .unwrap();
        store.replace_document_tags(document, vec![group("C")]).unwrap();

        let stored = store.tags_for(document);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].tag.text, "C");
        assert_eq!(store.document_count(), 1);
    }

    #[test]
    fn test_documents_are_independent() {
        let store = InMemoryTagStore::new();
        store
            .replace_document_tags(DocumentId(1), vec![group("A")])
            .unwrap();
        store
            .replace_document_tags(DocumentId(2), vec![group("B")])
            .unwrap();
        assert_eq!(store.tags_for(DocumentId(1))[0].tag.text, "A");
        assert_eq!(store.tags_for(DocumentId(2))[0].tag.text, "B");
    }

    #[test]
    fn test_readers_never_observe_partial_replacement() {
        let store = Arc::new(InMemoryTagStore::new());
        let document = DocumentId(1);
        let two = vec![group("A"), group("B")];
        let three = vec![group("C"), group("D"), group("E")];
        store.replace_document_tags(document, two.clone()).unwrap();

        std::thread::scope(|scope| {
            let writer = Arc::clone(&store);
            scope.spawn(move || {
                for round in 0..200 {
                    let groups = if round % 2 == 0 { three.clone() } else { two.clone() };
                    writer.replace_document_tags(document, groups).unwrap();
                }
            });
            for _ in 0..200 {
                let seen = store.tags_for(document).len();
                assert!(seen == 2 || seen == 3, "observed partial tag set of {seen}");
            }
        });
    }
}
