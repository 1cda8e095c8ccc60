use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::credential::IdentityResponse;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly minted, signed session token.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub value: String,
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// The verified subject of a session token.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<SessionClaims> for Identity {
    fn from(claims: SessionClaims) -> Self {
        Identity {
            subject: claims.sub,
            issued_at: DateTime::from_timestamp(claims.iat, 0).unwrap_or_default(),
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_default(),
        }
    }
}

impl From<&Identity> for IdentityResponse {
    fn from(identity: &Identity) -> Self {
        IdentityResponse {
            identifier: identity.subject.clone(),
            issued_at: identity.issued_at,
            expires_at: identity.expires_at,
        }
    }
}
