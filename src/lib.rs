use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;
pub mod telemetry;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db, http, limiter, media, utils};

use auth::{cookie::CookieSettings, jwt::JwtService};
use limiter::rate_limiter::LoginRateLimiter;
use media::cloudinary::CloudinaryClient;
use repositories::{
    credential::CredentialRepository,
    document::DocumentRepository,
    media::{MediaHost, UnconfiguredMediaHost},
    sqlx_repo::{SqlxCredentialRepo, SqlxDocumentRepo},
};
use use_cases::{auth::AuthHandler, media::MediaHandler, resources::ResourceHandler};

pub type AppAuthHandler = AuthHandler<Arc<dyn CredentialRepository>, JwtService>;
pub type AppResourceHandler = ResourceHandler<Arc<dyn DocumentRepository>>;
pub type AppMediaHandler = MediaHandler<Arc<dyn MediaHost>>;

/// Process-wide dependencies, built once at startup and shared with every
/// worker through `web::Data`.
pub struct AppState {
    pub auth_handler: AppAuthHandler,
    pub resource_handler: AppResourceHandler,
    pub media_handler: AppMediaHandler,
    pub login_limiter: LoginRateLimiter,
    pub cookie: CookieSettings,
    pub trust_x_forwarded_for: bool,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let credential_repo: Arc<dyn CredentialRepository> = Arc::new(SqlxCredentialRepo::new(pool.clone()));
        let document_repo: Arc<dyn DocumentRepository> = Arc::new(SqlxDocumentRepo::new(pool));

        let media_host: Arc<dyn MediaHost> = if config.media_configured() {
            match CloudinaryClient::new(config) {
                Ok(client) => Arc::new(client),
                Err(e) => {
                    tracing::error!("Media host client error: {}", e);
                    Arc::new(UnconfiguredMediaHost)
                }
            }
        } else {
            tracing::warn!("Cloudinary credentials missing; upload and delete routes will return 503");
            Arc::new(UnconfiguredMediaHost)
        };

        AppState {
            auth_handler: AuthHandler::new(credential_repo, JwtService::new(config)),
            resource_handler: ResourceHandler::new(document_repo),
            media_handler: MediaHandler::new(media_host),
            login_limiter: LoginRateLimiter::from(config),
            cookie: CookieSettings::from(config),
            trust_x_forwarded_for: config.trust_x_forwarded_for,
        }
    }
}
