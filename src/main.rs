use std::io;

use actix_multipart::form::MultipartFormConfig;
use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use associates_backend::{
    auth::password::warm_dummy_hash,
    background_task::start_limiter_eviction_task,
    constants::START_TIME,
    db::postgres::{create_pool, run_migrations},
    errors::AuthError,
    graceful_shutdown::shutdown_signal,
    http::cors::cors_policy,
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    telemetry::init_tracing,
    AppState,
};
use once_cell::sync::Lazy;
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing(matches!(AppEnvironment::from_env(), Ok(AppEnvironment::Production)));
    Lazy::force(&START_TIME);

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        },
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = create_pool(&config.database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create database connection pool: {}", e);
            io::Error::other(e)
        })?;

    run_migrations(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to run migrations: {}", e);
            io::Error::other(e)
        })?;

    // Compute the dummy hash before the first login can observe its cost
    warm_dummy_hash();

    let app_state = web::Data::new(AppState::new(&config, pool.clone()));

    if let Some((identifier, secret)) = config.admin_credential() {
        match app_state.auth_handler.provision_credential(identifier, secret).await {
            Ok(()) => tracing::info!("Bootstrap credential '{}' provisioned", identifier),
            Err(AuthError::AlreadyProvisioned) => {
                tracing::debug!("Bootstrap credential '{}' already present", identifier)
            }
            Err(e) => tracing::warn!("Bootstrap credential not provisioned: {}", e),
        }
    }

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "🚀 Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let eviction_task = tokio::spawn(start_limiter_eviction_task(app_state.login_limiter.clone()));

    let server_config = config.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(
                MultipartFormConfig::default()
                    .total_limit(server_config.upload_max_bytes)
                    .memory_limit(server_config.upload_max_bytes)
            )
            .wrap(NormalizePath::trim())
            .wrap(cors_policy(&server_config))
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .disable_signals()
    .bind(server_addr)?
    .run();

    let handle = server.handle();

    let result = tokio::select! {
        res = server => res,
        _ = shutdown_signal() => {
            handle.stop(true).await;
            Ok(())
        }
    };

    eviction_task.abort();
    pool.close().await;
    tracing::info!("Shutdown complete");

    result
}
