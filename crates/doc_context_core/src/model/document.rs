//! Document, notebook and listing models.
//!
//! # Responsibility
//! - Describe documents as the store returns them.
//! - Split logical/human paths into aligned segments.
//!
//! # Invariants
//! - The `.sy` file suffix is stripped from the final logical segment only,
//!   and only while splitting a raw store path. Identifiers coming from
//!   documents or listings are never rewritten.
//! - Notebook lookup is a pure in-memory operation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// File suffix the store appends to document paths and listing names.
pub const DOCUMENT_FILE_SUFFIX: &str = ".sy";

/// Listing path that addresses the root of a notebook.
pub const NOTEBOOK_ROOT_PATH: &str = "/";

/// Stable block identifier of one document, e.g. `20240610145535-abcdefg`.
pub type DocId = String;

/// Document metadata snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document block id.
    pub id: DocId,
    /// Owning notebook id.
    pub box_id: String,
    /// Raw logical path, e.g. `/idA/idB/idC.sy`.
    pub path: String,
    /// Human path, e.g. `/Title A/Title B/Title C`.
    pub hpath: String,
    /// Display title.
    pub title: String,
}

impl Document {
    /// Returns the split logical path of this document.
    pub fn logical_path(&self) -> LogicalPath {
        LogicalPath::parse(&self.path)
    }

    /// Store path that lists this document's siblings.
    ///
    /// Equals the parent's stored path, or [`NOTEBOOK_ROOT_PATH`] at root.
    pub fn sibling_listing_path(&self) -> String {
        sibling_listing_path(&self.path)
    }

    /// Returns human path segments with the leading separator removed.
    pub fn human_segments(&self) -> Vec<&str> {
        split_human_path(&self.hpath)
    }
}

/// Logical path split into ancestor identifiers, root first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalPath {
    segments: Vec<DocId>,
}

impl LogicalPath {
    /// Splits a raw store path on `/`, dropping empty segments.
    pub fn parse(raw: &str) -> Self {
        let mut segments: Vec<DocId> = raw
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        if let Some(last) = segments.last_mut() {
            if let Some(stripped) = last.strip_suffix(DOCUMENT_FILE_SUFFIX) {
                *last = stripped.to_string();
            }
        }
        segments.retain(|segment| !segment.is_empty());
        Self { segments }
    }

    /// Ancestor identifiers, root first, ending with the document itself.
    pub fn segments(&self) -> &[DocId] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Identifier of the direct parent. `None` for root-level documents.
    pub fn parent_id(&self) -> Option<&str> {
        if self.segments.len() < 2 {
            return None;
        }
        self.segments
            .get(self.segments.len() - 2)
            .map(String::as_str)
    }

}

/// Cuts a raw store path at its last separator.
///
/// The file suffix is carried over only when the raw path has one, so
/// `/n1/n2/n3.sy` lists `/n1/n2.sy` and `/n1/n2/n3` lists `/n1/n2`.
pub fn sibling_listing_path(raw: &str) -> String {
    let raw = raw.trim_end_matches('/');
    let suffix = if raw.ends_with(DOCUMENT_FILE_SUFFIX) {
        DOCUMENT_FILE_SUFFIX
    } else {
        ""
    };
    let parent = match raw.rfind('/') {
        Some(cut) => raw[..cut].trim_end_matches('/'),
        None => "",
    };
    if parent.is_empty() {
        return NOTEBOOK_ROOT_PATH.to_string();
    }
    format!("{parent}{suffix}")
}

/// Splits a human path into titles, dropping the leading separator.
pub fn split_human_path(hpath: &str) -> Vec<&str> {
    let trimmed = hpath.strip_prefix('/').unwrap_or(hpath);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('/').collect()
}

/// One `{title, id}` pair of the breadcrumb chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AncestorEntry {
    pub title: String,
    pub id: DocId,
}

impl AncestorEntry {
    pub fn new(title: impl Into<String>, id: impl Into<DocId>) -> Self {
        Self {
            title: title.into(),
            id: id.into(),
        }
    }
}

/// One document directly under a listed path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// Document block id.
    pub id: DocId,
    /// File-system style name, usually `<title>.sy`.
    pub name: String,
    /// Raw logical path of the entry.
    pub path: String,
    /// Number of direct child documents.
    #[serde(default)]
    pub sub_file_count: u32,
}

impl ListingEntry {
    /// Name with the trailing document-file suffix removed.
    pub fn display_name(&self) -> &str {
        self.name
            .strip_suffix(DOCUMENT_FILE_SUFFIX)
            .unwrap_or(self.name.as_str())
    }
}

/// Notebook (box) record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notebook {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub closed: bool,
}

/// Flat, in-memory notebook lookup populated once per activation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotebookDirectory {
    by_id: BTreeMap<String, Notebook>,
}

impl NotebookDirectory {
    pub fn new(notebooks: impl IntoIterator<Item = Notebook>) -> Self {
        Self {
            by_id: notebooks
                .into_iter()
                .map(|notebook| (notebook.id.clone(), notebook))
                .collect(),
        }
    }

    pub fn get(&self, box_id: &str) -> Option<&Notebook> {
        self.by_id.get(box_id)
    }

    /// Display name for a notebook, falling back to its id when unknown.
    pub fn display_name<'a>(&'a self, box_id: &'a str) -> &'a str {
        self.get(box_id)
            .map(|notebook| notebook.name.as_str())
            .unwrap_or(box_id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
