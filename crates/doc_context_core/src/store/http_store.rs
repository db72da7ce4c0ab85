//! HTTP implementation of [`DocumentStore`] against the host API.
//!
//! # Responsibility
//! - Issue one `POST` per lookup and unwrap the `{code, msg, data}` envelope.
//! - Normalize rows, listings and outlines into model types.
//!
//! # Invariants
//! - Ids interpolated into SQL are validated as block ids first.
//! - No retries and no caching.

use super::raw::{ApiEnvelope, RawBlockRow, RawListing, RawNotebooks, RawOutlineRecord};
use super::{ensure_valid_doc_id, reshape_outline, DocumentStore, StoreError, StoreResult};
use crate::config::StoreConfig;
use crate::model::document::{DocId, Document, ListingEntry, Notebook};
use crate::model::outline::OutlineNode;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

const SQL_ENDPOINT: &str = "/api/query/sql";
const LIST_DOCS_ENDPOINT: &str = "/api/filetree/listDocsByPath";
const CREATE_DOC_ENDPOINT: &str = "/api/filetree/createDocWithMd";
const OUTLINE_ENDPOINT: &str = "/api/outline/getDocOutline";
const NOTEBOOKS_ENDPOINT: &str = "/api/notebook/lsNotebooks";

/// Store client backed by the host's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpDocumentStore {
    /// Builds a client for `config.base_url`.
    ///
    /// # Errors
    /// - `InvalidBaseUrl` when the URL does not parse or is not http(s).
    /// - `Http` when the underlying client cannot be built.
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let trimmed = config.base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed)
            .map_err(|_| StoreError::InvalidBaseUrl(config.base_url.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(StoreError::InvalidBaseUrl(config.base_url.clone()));
        }

        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: trimmed.to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, T>(&self, endpoint: &'static str, body: &B) -> StoreResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self
            .client
            .post(format!("{}{endpoint}", self.base_url))
            .json(body);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Token {token}"));
        }

        let response = request.send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        let envelope: ApiEnvelope<T> = serde_json::from_slice(&bytes)?;
        if envelope.code != 0 {
            warn!(
                "event=store_request module=store status=error endpoint={endpoint} code={}",
                envelope.code
            );
            return Err(StoreError::Api {
                code: envelope.code,
                msg: envelope.msg,
            });
        }
        debug!("event=store_request module=store status=ok endpoint={endpoint}");
        Ok(envelope.data)
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn get_document(&self, id: &str) -> StoreResult<Document> {
        ensure_valid_doc_id(id)?;
        let stmt = format!("SELECT * FROM blocks WHERE id = '{id}' AND type = 'd'");
        let rows: Vec<RawBlockRow> = self
            .post(SQL_ENDPOINT, &json!({ "stmt": stmt }))
            .await?
            .unwrap_or_default();
        rows.into_iter()
            .next()
            .map(Document::from)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list_documents(&self, box_id: &str, path: &str) -> StoreResult<Vec<ListingEntry>> {
        let listing: Option<RawListing> = self
            .post(
                LIST_DOCS_ENDPOINT,
                &json!({ "notebook": box_id, "path": path }),
            )
            .await?;
        Ok(listing
            .and_then(|listing| listing.files)
            .unwrap_or_default()
            .into_iter()
            .map(ListingEntry::from)
            .collect())
    }

    async fn create_document(
        &self,
        box_id: &str,
        hpath: &str,
        markdown: &str,
    ) -> StoreResult<DocId> {
        let id: Option<String> = self
            .post(
                CREATE_DOC_ENDPOINT,
                &json!({ "notebook": box_id, "path": hpath, "markdown": markdown }),
            )
            .await?;
        id.filter(|id| !id.is_empty()).ok_or(StoreError::Api {
            code: 0,
            msg: "create document returned no id".to_string(),
        })
    }

    async fn fetch_outline(&self, doc_id: &str) -> StoreResult<Vec<OutlineNode>> {
        ensure_valid_doc_id(doc_id)?;
        let records: Vec<RawOutlineRecord> = self
            .post(OUTLINE_ENDPOINT, &json!({ "id": doc_id }))
            .await?
            .unwrap_or_default();
        Ok(reshape_outline(&records))
    }

    async fn list_notebooks(&self) -> StoreResult<Vec<Notebook>> {
        let notebooks: Option<RawNotebooks> = self.post(NOTEBOOKS_ENDPOINT, &json!({})).await?;
        Ok(notebooks
            .map(|notebooks| notebooks.notebooks)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::HttpDocumentStore;
    use crate::config::StoreConfig;
    use crate::store::StoreError;

    #[test]
    fn rejects_non_http_base_url() {
        let err = HttpDocumentStore::new(&StoreConfig::new("ftp://example.com", None))
            .expect_err("ftp scheme must be rejected");
        assert!(matches!(err, StoreError::InvalidBaseUrl(_)));

        let err = HttpDocumentStore::new(&StoreConfig::new("not a url", None))
            .expect_err("garbage url must be rejected");
        assert!(matches!(err, StoreError::InvalidBaseUrl(_)));
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let store = HttpDocumentStore::new(&StoreConfig::new("http://127.0.0.1:6806/", None))
            .expect("valid base url");
        assert_eq!(store.base_url(), "http://127.0.0.1:6806");
    }
}
