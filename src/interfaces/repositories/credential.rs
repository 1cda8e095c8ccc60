use std::{borrow::Cow, sync::Arc};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::credential::{Credential, CredentialInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxCredentialRepo,
};

#[async_trait]
pub trait CredentialRepository: Send + Sync {
    async fn get_credential(&self, identifier: &str) -> Result<Option<Credential>, AppError>;
    async fn create_credential(&self, credential: &CredentialInsert) -> Result<Uuid, AppError>;
    async fn update_password_hash(&self, identifier: &str, password_hash: &str) -> Result<(), AppError>;
}

#[async_trait]
impl<R> CredentialRepository for Arc<R>
where
    R: CredentialRepository + ?Sized,
{
    async fn get_credential(&self, identifier: &str) -> Result<Option<Credential>, AppError> {
        (**self).get_credential(identifier).await
    }

    async fn create_credential(&self, credential: &CredentialInsert) -> Result<Uuid, AppError> {
        (**self).create_credential(credential).await
    }

    async fn update_password_hash(&self, identifier: &str, password_hash: &str) -> Result<(), AppError> {
        (**self).update_password_hash(identifier, password_hash).await
    }
}

impl SqlxCredentialRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxCredentialRepo { pool }
    }
}

#[async_trait]
impl CredentialRepository for SqlxCredentialRepo {
    async fn get_credential(&self, identifier: &str) -> Result<Option<Credential>, AppError> {
        sqlx::query_as::<_, Credential>(
            "SELECT id, identifier, password_hash, created_at, updated_at FROM credentials WHERE identifier = $1",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn create_credential(&self, credential: &CredentialInsert) -> Result<Uuid, AppError> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO credentials (id, identifier, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&credential.identifier)
        .bind(&credential.password_hash)
        .bind(credential.created_at)
        .bind(credential.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")) => {
                AppError::Conflict("Credential with this identifier already exists".to_string())
            }
            _ => AppError::from(e),
        })
    }

    async fn update_password_hash(&self, identifier: &str, password_hash: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE credentials SET password_hash = $2, updated_at = NOW() WHERE identifier = $1",
        )
        .bind(identifier)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Credential not found".to_string()));
        }
        Ok(())
    }
}
