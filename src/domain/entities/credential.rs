use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Credential {
    pub id: Uuid,
    pub identifier: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct CredentialInsert {
    pub identifier: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CredentialInsert {
    pub fn new(identifier: &str, password_hash: String) -> Self {
        let now = Utc::now();
        CredentialInsert {
            identifier: identifier.trim().to_string(),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Login body. Older clients post `username`/`email` and `password`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "email")]
    #[validate(length(min = 1, message = "Identifier cannot be empty"))]
    pub identifier: String,

    #[serde(alias = "password")]
    #[validate(length(min = 1, message = "Secret cannot be empty"))]
    pub secret: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub identifier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotateSecretRequest {
    pub current_secret: String,
    pub new_secret: String,
}

#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub identifier: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
