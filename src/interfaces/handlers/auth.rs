use actix_web::{post, web, HttpRequest, HttpResponse, Responder, ResponseError};

use crate::entities::credential::{IdentityResponse, LoginRequest, LoginResponse, RotateSecretRequest};
use crate::errors::AuthError;
use crate::limiter::rate_limiter::RateDecision;
use crate::use_cases::extractors::AuthIdentity;
use crate::utils::client_ip::client_key;
use crate::AppState;

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    credentials: web::Json<LoginRequest>
) -> impl Responder {
    let client = client_key(&req, state.trust_x_forwarded_for);
    if let RateDecision::Limited { retry_after } = state.login_limiter.check(&client) {
        tracing::warn!(%client, "Login throttled");
        return AuthError::RateLimited { retry_after }.error_response();
    }

    match state.auth_handler.login(credentials.into_inner()).await {
        Ok(token) => HttpResponse::Ok()
            .cookie(state.cookie.session_cookie(&token))
            .json(LoginResponse {
                message: "login successful".to_string(),
                identifier: token.subject,
            }),
        Err(e) => e.error_response(),
    }
}

/// Clears the auth cookie. The token itself stays valid until it expires.
#[post("/logout")]
pub async fn logout(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok()
        .cookie(state.cookie.removal_cookie())
        .json(serde_json::json!({"message": "logged out"}))
}

pub async fn me(identity: AuthIdentity) -> impl Responder {
    HttpResponse::Ok().json(IdentityResponse::from(&identity.0))
}

pub async fn rotate_secret(
    identity: AuthIdentity,
    state: web::Data<AppState>,
    request: web::Json<RotateSecretRequest>
) -> impl Responder {
    match state.auth_handler.rotate_secret(&identity.0, request.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({"message": "secret updated"})),
        Err(e) => e.error_response(),
    }
}
