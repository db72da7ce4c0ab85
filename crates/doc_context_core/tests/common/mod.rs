#![allow(dead_code)]

use async_trait::async_trait;
use doc_context_core::{
    DocId, Document, DocumentStore, ListingEntry, Notebook, OutlineNode, StoreError, StoreResult,
};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const BOX_ID: &str = "box1";

#[derive(Default)]
struct Inner {
    documents: BTreeMap<DocId, Document>,
    listings: BTreeMap<(String, String), Vec<ListingEntry>>,
    outlines: BTreeMap<DocId, Vec<OutlineNode>>,
    failing_listings: HashSet<String>,
    created: Vec<(String, String, String)>,
}

/// In-memory document tree keyed the way the host API keys it.
pub struct FakeStore {
    inner: Mutex<Inner>,
    calls: AtomicUsize,
    suffix: &'static str,
}

impl FakeStore {
    /// Store whose paths end in `.sy`, like the host's file tree.
    pub fn new() -> Arc<Self> {
        Self::with_suffix(".sy")
    }

    /// Store whose paths carry `suffix` (possibly none) after the last id.
    pub fn with_suffix(suffix: &'static str) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::default(),
            calls: AtomicUsize::new(0),
            suffix,
        })
    }

    /// Adds a document whose ancestry is `ids` (root first) titled `titles`.
    pub fn add_document(&self, ids: &[&str], titles: &[&str]) -> Document {
        let id = ids.last().expect("at least one id").to_string();
        let title = titles.last().expect("at least one title").to_string();
        let document = Document {
            id: id.clone(),
            box_id: BOX_ID.to_string(),
            path: format!("/{}{}", ids.join("/"), self.suffix),
            hpath: format!("/{}", titles.join("/")),
            title: title.clone(),
        };
        let parent_path = if ids.len() == 1 {
            "/".to_string()
        } else {
            format!("/{}{}", ids[..ids.len() - 1].join("/"), self.suffix)
        };

        let mut inner = self.inner.lock().unwrap();
        inner.documents.insert(id.clone(), document.clone());
        inner
            .listings
            .entry((BOX_ID.to_string(), parent_path))
            .or_default()
            .push(ListingEntry {
                id,
                name: format!("{title}.sy"),
                path: document.path.clone(),
                sub_file_count: 0,
            });
        document
    }

    pub fn remove_document(&self, id: &str) {
        self.inner.lock().unwrap().documents.remove(id);
    }

    /// Entries filed under `path`, bypassing call counting.
    pub fn listing(&self, path: &str) -> Vec<ListingEntry> {
        self.inner
            .lock()
            .unwrap()
            .listings
            .get(&(BOX_ID.to_string(), path.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_outline(&self, doc_id: &str, outline: Vec<OutlineNode>) {
        self.inner
            .lock()
            .unwrap()
            .outlines
            .insert(doc_id.to_string(), outline);
    }

    pub fn fail_listing(&self, path: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing_listings
            .insert(path.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<(String, String, String)> {
        self.inner.lock().unwrap().created.clone()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    async fn get_document(&self, id: &str) -> StoreResult<Document> {
        self.record_call();
        self.inner
            .lock()
            .unwrap()
            .documents
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list_documents(&self, box_id: &str, path: &str) -> StoreResult<Vec<ListingEntry>> {
        self.record_call();
        let inner = self.inner.lock().unwrap();
        if inner.failing_listings.contains(path) {
            return Err(StoreError::Api {
                code: -1,
                msg: format!("listing failed: {path}"),
            });
        }
        Ok(inner
            .listings
            .get(&(box_id.to_string(), path.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn create_document(
        &self,
        box_id: &str,
        hpath: &str,
        markdown: &str,
    ) -> StoreResult<DocId> {
        self.record_call();
        let mut inner = self.inner.lock().unwrap();
        inner
            .created
            .push((box_id.to_string(), hpath.to_string(), markdown.to_string()));
        Ok(format!("created-{}", inner.created.len()))
    }

    async fn fetch_outline(&self, doc_id: &str) -> StoreResult<Vec<OutlineNode>> {
        self.record_call();
        Ok(self
            .inner
            .lock()
            .unwrap()
            .outlines
            .get(doc_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_notebooks(&self) -> StoreResult<Vec<Notebook>> {
        self.record_call();
        Ok(vec![Notebook {
            id: BOX_ID.to_string(),
            name: "Journal".to_string(),
            closed: false,
        }])
    }
}

/// `/n1/n2/n3` with two siblings of `n3` and one child, plus a second root.
///
/// ```text
/// n1 (Title1)
///   n2 (Title2)
///     a  (Alpha)
///     n3 (Title3)
///       c1 (Child1)
///     z  (Zeta)
/// r2 (Root2)
/// ```
pub fn sample_tree() -> Arc<FakeStore> {
    populate(FakeStore::new())
}

/// [`sample_tree`] with paths like `/n1/n2/n3`, without a file suffix.
pub fn suffix_free_tree() -> Arc<FakeStore> {
    populate(FakeStore::with_suffix(""))
}

fn populate(store: Arc<FakeStore>) -> Arc<FakeStore> {
    store.add_document(&["n1"], &["Title1"]);
    store.add_document(&["n1", "n2"], &["Title1", "Title2"]);
    store.add_document(&["n1", "n2", "a"], &["Title1", "Title2", "Alpha"]);
    store.add_document(&["n1", "n2", "n3"], &["Title1", "Title2", "Title3"]);
    store.add_document(&["n1", "n2", "z"], &["Title1", "Title2", "Zeta"]);
    store.add_document(
        &["n1", "n2", "n3", "c1"],
        &["Title1", "Title2", "Title3", "Child1"],
    );
    store.add_document(&["r2"], &["Root2"]);
    store
}
