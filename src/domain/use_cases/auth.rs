use validator::Validate;

use crate::auth::password::{hash_password, verify_against_dummy, verify_password};
use crate::domain::password::{strength_feedback, validate_password_strength};
use crate::entities::credential::{CredentialInsert, LoginRequest, RotateSecretRequest};
use crate::entities::token::{Identity, SessionToken};
use crate::errors::{AppError, AuthError};
use crate::repositories::credential::CredentialRepository;
use crate::repositories::token::TokenServiceRepository;

pub struct AuthHandler<R, T>
where
    R: CredentialRepository,
    T: TokenServiceRepository,
{
    pub credential_repo: R,
    pub token_service: T,
}

impl<R, T> AuthHandler<R, T>
where
    R: CredentialRepository,
    T: TokenServiceRepository,
{
    pub fn new(credential_repo: R, token_service: T) -> Self {
        AuthHandler {
            credential_repo,
            token_service,
        }
    }

    /// Checks the credential and mints a session token for it.
    ///
    /// An unknown identifier and a wrong secret both yield
    /// `AuthError::InvalidCredentials`, and both cost one hash verification.
    pub async fn login(&self, request: LoginRequest) -> Result<SessionToken, AuthError> {
        request.validate()?;
        let identifier = request.identifier.trim();
        if identifier.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let credential = self.credential_repo.get_credential(identifier)
            .await
            .map_err(|e| {
                tracing::error!("Credential lookup failed: {}", e);
                AuthError::Internal("credential lookup failed".into())
            })?;

        let Some(credential) = credential else {
            verify_against_dummy(&request.secret);
            tracing::info!("Login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let is_secret_valid = verify_password(&request.secret, &credential.password_hash)
            .map_err(|e| {
                tracing::error!("Stored hash for credential {} is unusable: {}", credential.id, e);
                AuthError::InvalidCredentials
            })?;
        if !is_secret_valid {
            tracing::info!("Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.token_service.create_session_token(&credential.identifier)?;

        tracing::info!(subject = %token.subject, "Login succeeded");
        Ok(token)
    }

    /// Resolves the identity carried by an auth cookie value.
    ///
    /// Every failure collapses to `AuthError::Unauthenticated`; the reason is
    /// only logged.
    pub fn authenticate(&self, cookie_value: Option<&str>) -> Result<Identity, AuthError> {
        let token = match cookie_value.map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => {
                tracing::debug!("No session cookie on request");
                return Err(AuthError::Unauthenticated);
            }
        };

        self.token_service.verify_session_token(token).map_err(|e| {
            match e {
                AuthError::Expired => tracing::info!("Rejected expired session token"),
                _ => tracing::warn!("Rejected malformed or forged session token"),
            }
            AuthError::Unauthenticated
        })
    }

    /// Creates a credential after strength validation. Used to bootstrap the
    /// administrator account.
    pub async fn provision_credential(&self, identifier: &str, secret: &str) -> Result<(), AuthError> {
        let identifier = identifier.trim();
        if identifier.is_empty() || secret.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        validate_password_strength(secret)
            .map_err(|e| AuthError::WeakSecret(strength_feedback(&e)))?;

        let password_hash = hash_password(secret)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        match self.credential_repo.create_credential(&CredentialInsert::new(identifier, password_hash)).await {
            Ok(id) => {
                tracing::info!(%id, "Provisioned credential");
                Ok(())
            }
            Err(AppError::Conflict(_)) => Err(AuthError::AlreadyProvisioned),
            Err(e) => Err(AuthError::Internal(e.to_string())),
        }
    }

    /// Replaces the secret of the authenticated identity after re-checking
    /// the current one. Tokens issued earlier stay valid until expiry.
    pub async fn rotate_secret(&self, identity: &Identity, request: RotateSecretRequest) -> Result<(), AuthError> {
        if request.current_secret.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        validate_password_strength(&request.new_secret)
            .map_err(|e| AuthError::WeakSecret(strength_feedback(&e)))?;

        let credential = self.credential_repo.get_credential(&identity.subject)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        let is_secret_valid = verify_password(&request.current_secret, &credential.password_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;
        if !is_secret_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let password_hash = hash_password(&request.new_secret)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        self.credential_repo.update_password_hash(&credential.identifier, &password_hash)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(subject = %credential.identifier, "Rotated credential secret");
        Ok(())
    }
}
