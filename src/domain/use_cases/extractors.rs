use actix_web::{FromRequest, HttpRequest, HttpMessage};
use futures_util::future::{ready, Ready};
use crate::{entities::token::Identity, errors::AuthError};

/// Extractor for the identity placed on the request by `RequireAuth`.
/// Returns 401 if the request was not authenticated.
/// Usage: Add `identity: AuthIdentity` as a parameter to your handler function.
#[derive(Debug)]
pub struct AuthIdentity(pub Identity);

impl FromRequest for AuthIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<Identity>() {
            Some(identity) => ready(Ok(AuthIdentity(identity.clone()))),
            None => ready(Err(AuthError::Unauthenticated.into())),
        }
    }
}
