//! Connector types — matching the host's event and node payloads.

use serde::{Deserialize, Serialize};

/// One CSV line split into its positional fields.
///
/// Only the identifier is guaranteed; a short line leaves the trailing
/// fields as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub identifier: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub price: Option<String>,
    pub isbn: Option<String>,
}

/// Attributes of a "Book" node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
}

/// A book keyed by the CSV's first column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookNode {
    pub id: String,
    #[serde(flatten)]
    pub attributes: BookAttributes,
}

impl From<RawRecord> for BookNode {
    fn from(record: RawRecord) -> Self {
        Self {
            id: record.identifier,
            attributes: BookAttributes {
                title: record.title,
                author: record.author,
                description: record.description,
                image_path: record.image_path,
                price: record.price,
                isbn: record.isbn,
            },
        }
    }
}

/// Model-agnostic node handed to a sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl TryFrom<BookNode> for Node {
    type Error = serde_json::Error;

    fn try_from(book: BookNode) -> Result<Self, Self::Error> {
        let attributes = match serde_json::to_value(book.attributes)? {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        Ok(Self {
            id: book.id,
            attributes,
        })
    }
}

/// A node as held by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredNode {
    pub model: String,
    pub id: String,
    pub attributes: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Where the CSV lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

/// Registration state of a connector event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Enabled,
    Disabled,
}

/// Payload of the host's "enable" lifecycle event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnableEvent {
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub site_id: Option<String>,
}

/// Response returned to the host from the "enable" hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnableResponse {
    pub status_code: u16,
}

impl EnableResponse {
    pub fn ok() -> Self {
        Self { status_code: 200 }
    }
}
