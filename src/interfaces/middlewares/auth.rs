use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpMessage, ResponseError,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{errors::AuthError, AppState};

/// Which requests a `RequireAuth` wrapper gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScope {
    /// Every request needs a valid session.
    All,
    /// Only state-changing methods need a valid session; reads stay public.
    Writes,
}

/// Session-cookie gate, applied with `.wrap()` on the scopes and resources
/// that need it. Rejected requests get a 401 and never reach the handler.
#[derive(Debug, Clone, Copy)]
pub struct RequireAuth {
    scope: AuthScope,
}

impl RequireAuth {
    pub fn all() -> Self {
        RequireAuth { scope: AuthScope::All }
    }

    pub fn writes() -> Self {
        RequireAuth { scope: AuthScope::Writes }
    }
}

impl<S> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequireAuthService {
            service: Rc::new(service),
            scope: self.scope,
        })
    }
}

pub struct RequireAuthService<S> {
    service: Rc<S>,
    scope: AuthScope,
}

impl<S> Service<ServiceRequest> for RequireAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let scope = self.scope;

        Box::pin(async move {
            if !requires_auth(scope, req.method()) {
                return service.call(req).await;
            }

            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                tracing::error!("AppState missing in auth middleware");
                let err = AuthError::Internal("application state missing".into());
                return Ok(req.into_response(err.error_response()));
            };

            let cookie = req.cookie(&state.cookie.name);
            match state.auth_handler.authenticate(cookie.as_ref().map(|c| c.value())) {
                Ok(identity) => {
                    req.extensions_mut().insert(identity);
                    service.call(req).await
                }
                Err(err) => {
                    tracing::debug!(path = %req.path(), method = %req.method(), "Rejected unauthenticated request");
                    Ok(req.into_response(err.error_response()))
                }
            }
        })
    }
}

fn requires_auth(scope: AuthScope, method: &Method) -> bool {
    match scope {
        AuthScope::All => *method != Method::OPTIONS,
        AuthScope::Writes => !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_scope_leaves_reads_public() {
        assert!(!requires_auth(AuthScope::Writes, &Method::GET));
        assert!(!requires_auth(AuthScope::Writes, &Method::HEAD));
        assert!(requires_auth(AuthScope::Writes, &Method::POST));
        assert!(requires_auth(AuthScope::Writes, &Method::PUT));
        assert!(requires_auth(AuthScope::Writes, &Method::PATCH));
        assert!(requires_auth(AuthScope::Writes, &Method::DELETE));
    }

    #[test]
    fn all_scope_guards_everything_but_preflight() {
        assert!(requires_auth(AuthScope::All, &Method::GET));
        assert!(!requires_auth(AuthScope::All, &Method::OPTIONS));
    }
}
