//! Hierarchy resolution for the active document.
//!
//! # Responsibility
//! - Resolve parent, children, siblings and breadcrumb of one document.
//! - Issue independent lookups concurrently and join them.
//!
//! # Invariants
//! - No active document yields `Ok(None)` without touching the store.
//! - Any failed sub-lookup fails the whole resolution; no partial results.
//! - Siblings keep the active document; it is only marked as current.
//! - The ancestor chain is root-first and ends with the document itself.

use crate::host::ActiveDocumentProvider;
use crate::model::document::{AncestorEntry, Document, ListingEntry, NotebookDirectory};
use crate::store::{DocumentStore, StoreError};
use log::{debug, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Resolved hierarchical context of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocContext {
    pub document: Document,
    /// Display name of the owning notebook, or its id when unknown.
    pub notebook_name: String,
    /// `None` for root-level documents.
    pub parent: Option<Document>,
    pub children: Vec<ListingEntry>,
    pub siblings: Vec<ListingEntry>,
    /// Breadcrumb from the notebook root to the document, inclusive.
    pub ancestors: Vec<AncestorEntry>,
}

impl DocContext {
    /// Returns whether `entry` is the document this context was built for.
    pub fn is_current(&self, entry: &ListingEntry) -> bool {
        entry.id == self.document.id
    }

    /// Index of the active document in `siblings`.
    pub fn current_sibling_index(&self) -> Option<usize> {
        self.siblings.iter().position(|entry| self.is_current(entry))
    }
}

/// Errors from hierarchy resolution.
#[derive(Debug)]
pub enum HierarchyError {
    /// Active document or its parent no longer exists.
    DocumentNotFound(String),
    /// Store-level failure.
    Store(StoreError),
}

impl Display for HierarchyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentNotFound(id) => write!(f, "document not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HierarchyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for HierarchyError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::DocumentNotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Hierarchy resolver over a document store.
pub struct HierarchyService<S: DocumentStore> {
    store: S,
    notebooks: NotebookDirectory,
}

impl<S: DocumentStore> HierarchyService<S> {
    /// Creates a resolver with a notebook directory snapshot.
    pub fn new(store: S, notebooks: NotebookDirectory) -> Self {
        Self { store, notebooks }
    }

    pub fn notebooks(&self) -> &NotebookDirectory {
        &self.notebooks
    }

    /// Resolves the context of the active document.
    ///
    /// Returns `Ok(None)` when the host has no focused document.
    pub async fn resolve<P>(&self, provider: &P) -> Result<Option<DocContext>, HierarchyError>
    where
        P: ActiveDocumentProvider + ?Sized,
    {
        let Some(doc_id) = provider.active_document() else {
            debug!("event=resolve_context module=hierarchy status=skipped reason=no_active_document");
            return Ok(None);
        };
        let document = self.store.get_document(&doc_id).await?;
        self.resolve_document(document).await.map(Some)
    }

    /// Resolves the context of an already loaded document.
    pub async fn resolve_document(&self, document: Document) -> Result<DocContext, HierarchyError> {
        let (parent, children, siblings) = tokio::try_join!(
            self.parent_of(&document),
            self.children_of(&document),
            self.siblings_of(&document),
        )?;

        let ancestors = ancestor_chain(&document);
        let notebook_name = self.notebooks.display_name(&document.box_id).to_string();
        info!(
            "event=resolve_context module=hierarchy status=ok doc_id={} depth={} children={} siblings={}",
            document.id,
            ancestors.len(),
            children.len(),
            siblings.len()
        );

        Ok(DocContext {
            document,
            notebook_name,
            parent,
            children,
            siblings,
            ancestors,
        })
    }

    /// Loads the direct parent, or `None` for root-level documents.
    pub async fn parent_of(&self, document: &Document) -> Result<Option<Document>, HierarchyError> {
        let path = document.logical_path();
        let Some(parent_id) = path.parent_id() else {
            return Ok(None);
        };
        let parent = self.store.get_document(parent_id).await?;
        Ok(Some(parent))
    }

    /// Lists documents directly under `document`.
    pub async fn children_of(
        &self,
        document: &Document,
    ) -> Result<Vec<ListingEntry>, HierarchyError> {
        self.store
            .list_documents(&document.box_id, &document.path)
            .await
            .map_err(Into::into)
    }

    /// Lists documents sharing `document`'s parent, `document` included.
    ///
    /// Root-level documents list the notebook root.
    pub async fn siblings_of(
        &self,
        document: &Document,
    ) -> Result<Vec<ListingEntry>, HierarchyError> {
        let listing_path = document.sibling_listing_path();
        self.store
            .list_documents(&document.box_id, &listing_path)
            .await
            .map_err(Into::into)
    }
}

/// Zips logical and human path segments into a root-first breadcrumb.
///
/// When the human path is shorter than the logical path, the id doubles as
/// the title so the chain always covers every logical segment.
pub fn ancestor_chain(document: &Document) -> Vec<AncestorEntry> {
    let logical = document.logical_path();
    let titles = document.human_segments();
    logical
        .segments()
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let title = titles.get(index).copied().unwrap_or(id.as_str());
            AncestorEntry::new(title, id.as_str())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::ancestor_chain;
    use crate::model::document::{AncestorEntry, Document};

    fn document(path: &str, hpath: &str) -> Document {
        Document {
            id: "n3".to_string(),
            box_id: "box".to_string(),
            path: path.to_string(),
            hpath: hpath.to_string(),
            title: "Title3".to_string(),
        }
    }

    #[test]
    fn zips_titles_and_ids_root_first() {
        let chain = ancestor_chain(&document("/n1/n2/n3.sy", "/Title1/Title2/Title3"));
        assert_eq!(
            chain,
            vec![
                AncestorEntry::new("Title1", "n1"),
                AncestorEntry::new("Title2", "n2"),
                AncestorEntry::new("Title3", "n3"),
            ]
        );
    }

    #[test]
    fn short_human_path_falls_back_to_ids() {
        let chain = ancestor_chain(&document("/n1/n2/n3.sy", "/Title1"));
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[2], AncestorEntry::new("n3", "n3"));
    }
}
