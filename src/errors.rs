use std::borrow::Cow;
use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse
};
use jsonwebtoken::errors::{ErrorKind, Error as JwtError};
use derive_more::Display;
use serde::Serialize;
use validator::ValidationErrors;

#[derive(Debug)]
pub enum AppError {
    ValidationError(Vec<FieldError>),
    InvalidInput(String),
    NotFound(String),
    Conflict(String),
    ServiceUnavailable(String),
    BadGateway(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            AppError::BadGateway(msg) => write!(f, "Upstream error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg)
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationError(errors) => {
                serde_json::json!({
                    "message": "validation failed",
                    "details": errors
                })
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                serde_json::json!({"message": "internal server error"})
            }
            AppError::BadGateway(msg) => {
                tracing::error!("Upstream failure: {}", msg);
                serde_json::json!({"message": "media host request failed"})
            }
            AppError::InvalidInput(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::ServiceUnavailable(msg) => serde_json::json!({"message": msg}),
        };
        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let field_errors = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        AppError::ValidationError(field_errors)
    }
}

impl AppError {
    pub fn to_http_response(&self) -> HttpResponse {
        self.error_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(e) if e.code() == Some(Cow::Borrowed("23505")) => {
                AppError::Conflict("Database conflict occurred".into())
            }
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::InternalError(format!("Database error: {}", err))
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::NotConfigured => AppError::ServiceUnavailable("Media host is not configured".into()),
            MediaError::InvalidInput(msg) => AppError::InvalidInput(msg),
            MediaError::Upstream(msg) | MediaError::Rejected(msg) => AppError::BadGateway(msg),
        }
    }
}

/// Authentication failures. Every variant renders a `{message}` body that
/// carries no verification detail.
#[derive(Debug, Display, PartialEq)]
pub enum AuthError {
    #[display("Invalid credentials")]
    InvalidCredentials,

    #[display("Unauthenticated")]
    Unauthenticated,

    #[display("Token expired")]
    Expired,

    #[display("Missing credentials")]
    MissingCredentials,

    #[display("Token creation error")]
    TokenCreation,

    #[display("Weak secret: {_0}")]
    WeakSecret(String),

    #[display("Identifier already provisioned")]
    AlreadyProvisioned,

    #[display("Too many login attempts")]
    RateLimited { retry_after: u64 },

    #[display("Internal error: {_0}")]
    Internal(String),
}

impl AuthError {
    fn public_message(&self) -> Cow<'static, str> {
        match self {
            AuthError::InvalidCredentials => "invalid credentials".into(),
            AuthError::Unauthenticated | AuthError::Expired => "unauthenticated".into(),
            AuthError::MissingCredentials => "identifier and secret are required".into(),
            AuthError::WeakSecret(feedback) => format!("secret is too weak: {}", feedback).into(),
            AuthError::AlreadyProvisioned => "identifier already exists".into(),
            AuthError::RateLimited { .. } => "too many login attempts".into(),
            AuthError::TokenCreation | AuthError::Internal(_) => "internal server error".into(),
        }
    }
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        if let AuthError::Internal(msg) = self {
            tracing::error!("Authentication internal error: {}", msg);
        }

        let mut response = HttpResponse::build(self.status_code());
        if let AuthError::RateLimited { retry_after } = self {
            response.insert_header((header::RETRY_AFTER, retry_after.to_string()));
        }
        response.json(serde_json::json!({"message": self.public_message()}))
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Expired => StatusCode::UNAUTHORIZED,
            AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
            AuthError::TokenCreation => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::WeakSecret(_) => StatusCode::BAD_REQUEST,
            AuthError::AlreadyProvisioned => StatusCode::CONFLICT,
            AuthError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::Unauthenticated,
        }
    }
}

impl From<ValidationErrors> for AuthError {
    fn from(_: ValidationErrors) -> Self {
        AuthError::MissingCredentials
    }
}

#[derive(Debug, Display)]
pub enum PasswordError {
    #[display("Invalid password parameters: {_0}")]
    InvalidParameters(String),

    #[display("Password hashing failed: {_0}")]
    HashingError(String),

    #[display("Invalid password hash format: {_0}")]
    InvalidHashFormat(String),

    #[display("Password verification failed: {_0}")]
    VerificationError(String),
}

#[derive(Debug, Display)]
pub enum MediaError {
    #[display("Media host is not configured")]
    NotConfigured,

    #[display("Invalid media request: {_0}")]
    InvalidInput(String),

    #[display("Media host request failed: {_0}")]
    Upstream(String),

    #[display("Media host rejected the request: {_0}")]
    Rejected(String),
}

impl From<reqwest::Error> for MediaError {
    fn from(err: reqwest::Error) -> Self {
        MediaError::Upstream(err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}
