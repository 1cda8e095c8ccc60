use actix_cors::Cors;
use actix_web::http::{header, Method};

use crate::settings::AppConfig;

const PREFLIGHT_MAX_AGE_SECS: usize = 3600;

/// CORS policy from the configured allow-list. Credentials are allowed so the
/// browser sends the auth cookie cross-origin; a `*` entry means any origin.
pub fn cors_policy(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT])
        .allowed_header("x-requested-with")
        .supports_credentials()
        .max_age(PREFLIGHT_MAX_AGE_SECS);

    for origin in config.cors_origins() {
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else {
            cors = cors.allowed_origin(&origin);
        }
    }
    cors
}
