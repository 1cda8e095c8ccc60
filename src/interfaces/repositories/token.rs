use chrono::{DateTime, Utc};

use crate::{entities::token::{Identity, SessionToken}, errors::AuthError};

pub trait TokenServiceRepository: Send + Sync {
    /// Mints a session token for `subject` valid from now
    fn create_session_token(&self, subject: &str) -> Result<SessionToken, AuthError>;

    /// Mints a session token as if issued at `issued_at`
    fn create_session_token_at(&self, subject: &str, issued_at: DateTime<Utc>) -> Result<SessionToken, AuthError>;

    /// Verifies signature and expiry, returning the token's identity.
    /// Expired tokens yield `AuthError::Expired`, anything else invalid
    /// yields `AuthError::Unauthenticated`.
    fn verify_session_token(&self, token: &str) -> Result<Identity, AuthError>;
}
