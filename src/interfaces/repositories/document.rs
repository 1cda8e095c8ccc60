use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    entities::document::{Document, DocumentRow},
    errors::AppError,
    repositories::sqlx_repo::SqlxDocumentRepo,
};

/// Helper to compute OFFSET safely from 1-based `page` and `per_page`.
fn page_offset(page: u32, per_page: u32) -> i64 {
    let page = page.saturating_sub(1);
    (page as i64) * (per_page as i64)
}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn insert_document(&self, collection: &str, body: &Map<String, Value>) -> Result<Document, AppError>;
    async fn list_documents(&self, collection: &str, page: u32, per_page: u32) -> Result<Vec<Document>, AppError>;
    async fn count_documents(&self, collection: &str) -> Result<i64, AppError>;
    async fn get_document(&self, collection: &str, id: &Uuid) -> Result<Option<Document>, AppError>;
    /// Shallow-merges `patch` into the stored body.
    async fn update_document(&self, collection: &str, id: &Uuid, patch: &Map<String, Value>) -> Result<Option<Document>, AppError>;
    async fn delete_document(&self, collection: &str, id: &Uuid) -> Result<bool, AppError>;
}

#[async_trait]
impl<R> DocumentRepository for Arc<R>
where
    R: DocumentRepository + ?Sized,
{
    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }

    async fn insert_document(&self, collection: &str, body: &Map<String, Value>) -> Result<Document, AppError> {
        (**self).insert_document(collection, body).await
    }

    async fn list_documents(&self, collection: &str, page: u32, per_page: u32) -> Result<Vec<Document>, AppError> {
        (**self).list_documents(collection, page, per_page).await
    }

    async fn count_documents(&self, collection: &str) -> Result<i64, AppError> {
        (**self).count_documents(collection).await
    }

    async fn get_document(&self, collection: &str, id: &Uuid) -> Result<Option<Document>, AppError> {
        (**self).get_document(collection, id).await
    }

    async fn update_document(&self, collection: &str, id: &Uuid, patch: &Map<String, Value>) -> Result<Option<Document>, AppError> {
        (**self).update_document(collection, id, patch).await
    }

    async fn delete_document(&self, collection: &str, id: &Uuid) -> Result<bool, AppError> {
        (**self).delete_document(collection, id).await
    }
}

impl SqlxDocumentRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxDocumentRepo { pool }
    }
}

#[async_trait]
impl DocumentRepository for SqlxDocumentRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn insert_document(&self, collection: &str, body: &Map<String, Value>) -> Result<Document, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            INSERT INTO documents (id, collection, body, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING id, collection, body, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(collection)
        .bind(Json(body))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_documents(&self, collection: &str, page: u32, per_page: u32) -> Result<Vec<Document>, AppError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, collection, body, created_at, updated_at
            FROM documents
            WHERE collection = $1
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(collection)
        .bind(per_page as i64)
        .bind(page_offset(page, per_page))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn count_documents(&self, collection: &str) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM documents WHERE collection = $1")
            .bind(collection)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn get_document(&self, collection: &str, id: &Uuid) -> Result<Option<Document>, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, collection, body, created_at, updated_at
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }

    async fn update_document(&self, collection: &str, id: &Uuid, patch: &Map<String, Value>) -> Result<Option<Document>, AppError> {
        // jsonb `||` replaces top-level keys and keeps the rest
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            UPDATE documents
            SET body = body || $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            RETURNING id, collection, body, created_at, updated_at
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(patch))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }

    async fn delete_document(&self, collection: &str, id: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
