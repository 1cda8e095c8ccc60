use jsonwebtoken::{encode, Header, decode, Validation, Algorithm};
use chrono::{DateTime, Utc, Duration};

use crate::entities::token::{Identity, SessionClaims, SessionToken};
use crate::repositories::token::TokenServiceRepository;
use crate::settings::{AppConfig, JwtKeys};
use crate::errors::AuthError;

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    session_ttl: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
            session_ttl: Duration::days(config.session_ttl_days),
        }
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        // Rejects `exp <= now`, so a token is only valid strictly before its expiry
        validation.reject_tokens_expiring_in_less_than = 1;
        validation.set_required_spec_claims(&["exp", "sub", "iat"]);
        validation
    }
}

impl TokenServiceRepository for JwtService {
    fn create_session_token(&self, subject: &str) -> Result<SessionToken, AuthError> {
        self.create_session_token_at(subject, Utc::now())
    }

    fn create_session_token_at(&self, subject: &str, issued_at: DateTime<Utc>) -> Result<SessionToken, AuthError> {
        let expires_at = issued_at + self.session_ttl;

        let claims = SessionClaims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let value = encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding)
            .map_err(|e| {
                tracing::warn!("Failed to sign session token: {}", e);
                AuthError::TokenCreation
            })?;

        Ok(SessionToken {
            value,
            subject: claims.sub,
            issued_at,
            expires_at,
        })
    }

    fn verify_session_token(&self, token: &str) -> Result<Identity, AuthError> {
        decode::<SessionClaims>(token, &self.keys.decoding, &Self::validation())
            .map(|data| Identity::from(data.claims))
            .map_err(AuthError::from)
    }
}
