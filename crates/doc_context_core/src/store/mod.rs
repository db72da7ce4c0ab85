//! Remote document store contracts.
//!
//! # Responsibility
//! - Define the async lookups the resolver and navigators depend on.
//! - Map transport, API and decode failures into one error type.
//!
//! # Invariants
//! - No retries; a failed request is returned to the caller as-is.
//! - Heterogeneous upstream shapes are normalized before leaving this module.
//! - Missing documents surface as `StoreError::NotFound`, never as `Ok`.

use crate::model::document::{DocId, Document, ListingEntry, Notebook};
use crate::model::outline::OutlineNode;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod http_store;
pub(crate) mod raw;

pub use http_store::HttpDocumentStore;
pub use raw::{reshape_outline, RawOutlineRecord};

static DOC_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{14}-[0-9a-z]{7}$").expect("valid block id regex"));

/// Result type used by store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from remote store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Transport-level failure or non-success HTTP status.
    Http(reqwest::Error),
    /// Host API answered with a non-zero code.
    Api { code: i64, msg: String },
    /// Response body did not match the expected shape.
    Decode(serde_json::Error),
    /// Requested document does not exist.
    NotFound(DocId),
    /// Identifier is not a well-formed block id.
    InvalidId(String),
    /// Configured API base URL cannot be used.
    InvalidBaseUrl(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "store request failed: {err}"),
            Self::Api { code, msg } => write!(f, "store api error {code}: {msg}"),
            Self::Decode(err) => write!(f, "unexpected store response: {err}"),
            Self::NotFound(id) => write!(f, "document not found: {id}"),
            Self::InvalidId(id) => write!(f, "invalid document id: `{id}`"),
            Self::InvalidBaseUrl(url) => write!(f, "invalid store base url: `{url}`"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

/// Async access to the host's document tree.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Loads one document's metadata by id.
    async fn get_document(&self, id: &str) -> StoreResult<Document>;
    /// Lists documents directly under `path` in notebook `box_id`.
    async fn list_documents(&self, box_id: &str, path: &str) -> StoreResult<Vec<ListingEntry>>;
    /// Creates a document at a human path and returns its id.
    async fn create_document(
        &self,
        box_id: &str,
        hpath: &str,
        markdown: &str,
    ) -> StoreResult<DocId>;
    /// Loads a document's heading outline.
    async fn fetch_outline(&self, doc_id: &str) -> StoreResult<Vec<OutlineNode>>;
    /// Lists all notebooks.
    async fn list_notebooks(&self) -> StoreResult<Vec<Notebook>>;
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn get_document(&self, id: &str) -> StoreResult<Document> {
        (**self).get_document(id).await
    }

    async fn list_documents(&self, box_id: &str, path: &str) -> StoreResult<Vec<ListingEntry>> {
        (**self).list_documents(box_id, path).await
    }

    async fn create_document(
        &self,
        box_id: &str,
        hpath: &str,
        markdown: &str,
    ) -> StoreResult<DocId> {
        (**self).create_document(box_id, hpath, markdown).await
    }

    async fn fetch_outline(&self, doc_id: &str) -> StoreResult<Vec<OutlineNode>> {
        (**self).fetch_outline(doc_id).await
    }

    async fn list_notebooks(&self) -> StoreResult<Vec<Notebook>> {
        (**self).list_notebooks().await
    }
}

/// Returns whether `value` has the host's block id shape.
pub fn is_valid_doc_id(value: &str) -> bool {
    DOC_ID_RE.is_match(value)
}

/// Rejects ids that are not well-formed block ids.
pub fn ensure_valid_doc_id(value: &str) -> StoreResult<()> {
    if is_valid_doc_id(value) {
        Ok(())
    } else {
        Err(StoreError::InvalidId(value.to_string()))
    }
}
