//! In-document outline lookup.

use crate::host::ActiveDocumentProvider;
use crate::model::outline::OutlineNode;
use crate::store::{DocumentStore, StoreResult};
use log::debug;

/// Outline fetcher over a document store.
pub struct OutlineService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> OutlineService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads the heading forest of `doc_id`.
    pub async fn outline(&self, doc_id: &str) -> StoreResult<Vec<OutlineNode>> {
        let outline = self.store.fetch_outline(doc_id).await?;
        debug!(
            "event=fetch_outline module=outline status=ok doc_id={doc_id} headings={}",
            outline.iter().map(OutlineNode::subtree_len).sum::<usize>()
        );
        Ok(outline)
    }

    /// Loads the outline of the active document, `None` when there is none.
    pub async fn outline_for_active<P>(&self, provider: &P) -> StoreResult<Option<Vec<OutlineNode>>>
    where
        P: ActiveDocumentProvider + ?Sized,
    {
        match provider.active_document() {
            Some(doc_id) => self.outline(&doc_id).await.map(Some),
            None => Ok(None),
        }
    }
}
