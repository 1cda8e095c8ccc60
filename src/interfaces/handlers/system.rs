use actix_web::{get, web, HttpResponse, Responder};
use humantime::format_duration;
use serde::Serialize;
use std::time::Duration;

use crate::{constants::START_TIME, repositories::document::DocumentRepository, AppState};

#[derive(Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    version: &'static str,
    uptime: String,
    started_at: String,
    database: &'static str,
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let uptime = chrono::Utc::now().signed_duration_since(*START_TIME);
    let uptime = format_duration(Duration::from_secs(uptime.num_seconds().max(0) as u64));

    let database_ok = match state.resource_handler.document_repo.check_connection().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Health check database probe failed: {}", e);
            false
        }
    };

    let body = HealthCheckResponse {
        status: if database_ok { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime: uptime.to_string(),
        started_at: START_TIME.to_rfc3339(),
        database: if database_ok { "ok" } else { "unavailable" },
    };

    if database_ok {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
