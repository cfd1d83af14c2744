use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One CouchDB document per store key; the document id is the key itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchKvDocument {
    #[serde(rename = "_id")]
    pub id: String,
    /// Revision the write is based on; absent when creating the document.
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(default)]
    pub value: Value,
}

impl CouchKvDocument {
    pub fn new(key: &str, value: Value, rev: Option<String>) -> Self {
        Self {
            id: key.to_owned(),
            rev,
            value,
        }
    }
}
