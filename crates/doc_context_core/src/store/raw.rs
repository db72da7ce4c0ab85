//! Wire shapes of the host API and their normalization.

use crate::model::document::{Document, ListingEntry, Notebook};
use crate::model::outline::OutlineNode;
use serde::Deserialize;

/// `{code, msg, data}` envelope wrapping every host API response.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

/// One row of the `blocks` table as returned by the SQL endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct RawBlockRow {
    pub id: String,
    #[serde(rename = "box")]
    pub box_id: String,
    pub path: String,
    #[serde(default)]
    pub hpath: String,
    #[serde(default)]
    pub content: String,
}

impl From<RawBlockRow> for Document {
    fn from(value: RawBlockRow) -> Self {
        Self {
            id: value.id,
            box_id: value.box_id,
            path: value.path,
            hpath: value.hpath,
            title: value.content,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawListing {
    #[serde(default)]
    pub files: Option<Vec<RawListingFile>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawListingFile {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub sub_file_count: u32,
}

impl From<RawListingFile> for ListingEntry {
    fn from(value: RawListingFile) -> Self {
        Self {
            id: value.id,
            name: value.name,
            path: value.path,
            sub_file_count: value.sub_file_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawNotebooks {
    #[serde(default)]
    pub notebooks: Vec<Notebook>,
}

/// Outline record as sent by the host.
///
/// Heading text arrives as `name` or `content`, nested headings as `blocks`
/// or `children`, depending on the node kind.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOutlineRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub blocks: Option<Vec<RawOutlineRecord>>,
    #[serde(default)]
    pub children: Option<Vec<RawOutlineRecord>>,
}

/// Maps raw outline records into canonical [`OutlineNode`]s.
///
/// `count == 0` always yields no children, whatever nested data is present.
pub fn reshape_outline(records: &[RawOutlineRecord]) -> Vec<OutlineNode> {
    records.iter().map(reshape_record).collect()
}

fn reshape_record(record: &RawOutlineRecord) -> OutlineNode {
    let name = record
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .or(record.content.as_deref())
        .unwrap_or_default()
        .to_string();

    let children = if record.count > 0 {
        record
            .blocks
            .as_deref()
            .or(record.children.as_deref())
            .map(reshape_outline)
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    OutlineNode {
        depth: record.depth,
        name,
        id: record.id.clone(),
        children,
    }
}
