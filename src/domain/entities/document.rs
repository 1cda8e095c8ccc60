use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use uuid::Uuid;

use crate::errors::AppError;

const RESERVED_KEYS: [&str; 4] = ["id", "_id", "created_at", "updated_at"];
pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub collection: String,
    pub body: Json<Map<String, Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored document, serialised with its body fields flattened beside the
/// bookkeeping columns.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Document {
    pub id: Uuid,
    #[serde(flatten)]
    pub body: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            body: row.body.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Client supplied document fields, reserved keys removed.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentBody(Map<String, Value>);

impl DocumentBody {
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl TryFrom<Value> for DocumentBody {
    type Error = AppError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(mut map) => {
                for key in RESERVED_KEYS {
                    map.remove(key);
                }
                if map.is_empty() {
                    return Err(AppError::InvalidInput("Document body cannot be empty".into()));
                }
                Ok(DocumentBody(map))
            }
            _ => Err(AppError::InvalidInput("Document body must be a JSON object".into())),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListQuery {
    /// Returns `(page, per_page)` with page >= 1 and per_page within 1..=MAX_PER_PAGE.
    pub fn normalized(&self) -> (u32, u32) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
        (page, per_page)
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentPage {
    pub data: Vec<Document>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_reserved_keys() {
        let body = DocumentBody::try_from(json!({
            "id": "forged",
            "created_at": "2020-01-01",
            "title": "Hello"
        }))
        .unwrap();
        assert_eq!(body.as_map().len(), 1);
        assert_eq!(body.as_map()["title"], "Hello");
    }

    #[test]
    fn rejects_non_objects_and_empty_bodies() {
        assert!(DocumentBody::try_from(json!(["a"])).is_err());
        assert!(DocumentBody::try_from(json!("text")).is_err());
        assert!(DocumentBody::try_from(json!({"_id": 1})).is_err());
    }

    #[test]
    fn clamps_pagination() {
        let query = ListQuery { page: Some(0), per_page: Some(1000) };
        assert_eq!(query.normalized(), (1, MAX_PER_PAGE));
        assert_eq!(ListQuery::default().normalized(), (1, DEFAULT_PER_PAGE));
    }
}
