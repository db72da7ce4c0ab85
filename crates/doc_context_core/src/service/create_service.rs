//! New sibling/child document creation.
//!
//! # Responsibility
//! - Derive the human path of a new document next to or under the active one.
//! - Create it through the store.
//!
//! # Invariants
//! - Titles are trimmed, non-blank, and contain no `/`.
//! - Siblings of root-level documents are created at the notebook root.

use crate::host::ActiveDocumentProvider;
use crate::model::document::{split_human_path, DocId, Document};
use crate::store::{DocumentStore, StoreError};
use log::info;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Where the new document goes relative to the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Sibling,
    Child,
}

/// Created document handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedDocument {
    pub id: DocId,
    pub box_id: String,
    pub hpath: String,
}

/// Errors from document creation.
#[derive(Debug)]
pub enum CreateError {
    /// Title is blank after trim or contains a path separator.
    InvalidTitle(String),
    Store(StoreError),
}

impl Display for CreateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle(value) => write!(f, "invalid document title: `{value}`"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CreateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for CreateError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Document creation over a store.
pub struct CreateService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> CreateService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates an empty document placed relative to the active document.
    ///
    /// Returns `Ok(None)` when there is no active document.
    pub async fn create<P>(
        &self,
        provider: &P,
        placement: Placement,
        title: &str,
    ) -> Result<Option<CreatedDocument>, CreateError>
    where
        P: ActiveDocumentProvider + ?Sized,
    {
        let title = normalize_title(title)?;
        let Some(doc_id) = provider.active_document() else {
            return Ok(None);
        };
        let document = self.store.get_document(&doc_id).await?;
        let hpath = derive_hpath(&document, placement, &title);
        let id = self
            .store
            .create_document(&document.box_id, &hpath, "")
            .await?;
        info!(
            "event=create_document module=create status=ok placement={placement:?} doc_id={id}"
        );
        Ok(Some(CreatedDocument {
            id,
            box_id: document.box_id,
            hpath,
        }))
    }
}

/// Human path for a new document titled `title`.
pub fn derive_hpath(document: &Document, placement: Placement, title: &str) -> String {
    let mut segments = split_human_path(&document.hpath);
    if placement == Placement::Sibling {
        segments.pop();
    }
    segments.retain(|segment| !segment.is_empty());
    segments.push(title);
    format!("/{}", segments.join("/"))
}

fn normalize_title(value: &str) -> Result<String, CreateError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.contains('/') {
        return Err(CreateError::InvalidTitle(value.to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{derive_hpath, normalize_title, CreateError, Placement};
    use crate::model::document::Document;

    fn document(hpath: &str) -> Document {
        Document {
            id: "d".to_string(),
            box_id: "box".to_string(),
            path: "/a/d.sy".to_string(),
            hpath: hpath.to_string(),
            title: "D".to_string(),
        }
    }

    #[test]
    fn sibling_goes_next_to_document() {
        assert_eq!(
            derive_hpath(&document("/A/D"), Placement::Sibling, "New"),
            "/A/New"
        );
        assert_eq!(derive_hpath(&document("/D"), Placement::Sibling, "New"), "/New");
    }

    #[test]
    fn child_goes_under_document() {
        assert_eq!(
            derive_hpath(&document("/A/D"), Placement::Child, "New"),
            "/A/D/New"
        );
    }

    #[test]
    fn rejects_blank_and_slashed_titles() {
        assert!(matches!(
            normalize_title("   "),
            Err(CreateError::InvalidTitle(_))
        ));
        assert!(matches!(
            normalize_title("a/b"),
            Err(CreateError::InvalidTitle(_))
        ));
        assert_eq!(normalize_title("  Draft ").expect("valid title"), "Draft");
    }
}
