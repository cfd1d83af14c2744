use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Document holding one store key in the `kv` collection; the key doubles as `_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoKvDocument {
    #[serde(rename = "_id")]
    pub key: String,
    pub value: Value,
}

impl MongoKvDocument {
    pub fn new(key: &str, value: Value) -> Self {
        Self {
            key: key.to_owned(),
            value,
        }
    }
}

pub fn key_filter(key: &str) -> Document {
    doc! {"_id": key}
}
