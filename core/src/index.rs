use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub type DocId = u32;

/// Weight of one occurrence of a term in a document title.
pub const TITLE_WEIGHT: u32 = 10;
/// Weight of one occurrence of a term in a document body.
pub const BODY_WEIGHT: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub doc_id: DocId,
    pub title: String,
    pub body: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingEntry {
    pub doc_id: DocId,
    pub term: String,
    pub weight: u32, // title_count * TITLE_WEIGHT + body_count * BODY_WEIGHT
}

/// Postings for one term, in document processing order.
pub type PostingsList = Vec<PostingEntry>;

/// Forward and inverted index over one corpus.
///
/// Populated by [`crate::IndexBuilder`] and read-only afterwards. Not
/// internally synchronized; share it behind an `Arc` once built.
#[derive(Debug, Default)]
pub struct IndexStore {
    forward: Vec<DocumentRecord>,
    inverted: HashMap<String, PostingsList>,
}

impl IndexStore {
    pub fn new() -> Self { Self::default() }

    /// Look up a document by id.
    pub fn document(&self, doc_id: DocId) -> Option<&DocumentRecord> {
        self.forward.get(doc_id as usize)
    }

    /// Postings list of `term`, or `None` if no document contains it.
    pub fn postings(&self, term: &str) -> Option<&[PostingEntry]> {
        self.inverted.get(term).map(Vec::as_slice)
    }

    pub fn documents(&self) -> &[DocumentRecord] { &self.forward }

    /// Number of documents in the forward index.
    pub fn len(&self) -> usize { self.forward.len() }

    pub fn is_empty(&self) -> bool { self.forward.is_empty() }

    /// Number of distinct terms in the inverted index.
    pub fn term_count(&self) -> usize { self.inverted.len() }

    /// Append a document, assigning it the next doc id. Returns `None`, and
    /// stores nothing, once the doc id space is exhausted.
    pub(crate) fn push_document(&mut self, title: String, body: String, url: String) -> Option<DocId> {
        let doc_id = next_doc_id(self.forward.len())?;
        self.forward.push(DocumentRecord { doc_id, title, body, url });
        Some(doc_id)
    }

    pub(crate) fn push_posting(&mut self, posting: PostingEntry) {
        debug_assert!((posting.doc_id as usize) < self.forward.len());
        self.inverted.entry(posting.term.clone()).or_default().push(posting);
    }
}

fn next_doc_id(stored: usize) -> Option<DocId> {
    DocId::try_from(stored).ok()
}

/// Shared handle to a built index.
///
/// The store behind the handle is never mutated. Rebuilding means building a
/// whole new [`IndexStore`] and swapping it in with [`IndexHandle::replace`];
/// searches that already hold a snapshot keep using the old store.
#[derive(Debug, Clone)]
pub struct IndexHandle {
    inner: Arc<RwLock<Arc<IndexStore>>>,
}

impl IndexHandle {
    pub fn new(store: IndexStore) -> Self {
        Self { inner: Arc::new(RwLock::new(Arc::new(store))) }
    }

    /// The current store. The lock is released before this returns.
    pub fn snapshot(&self) -> Arc<IndexStore> {
        self.inner.read().clone()
    }

    /// Swap in a freshly built store and return the previous one.
    pub fn replace(&self, store: IndexStore) -> Arc<IndexStore> {
        std::mem::replace(&mut *self.inner.write(), Arc::new(store))
    }
}
