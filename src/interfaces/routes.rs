use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod auth;
mod json_error;
mod media;
mod resources;

/// Mounts every route. Expects `web::Data<AppState>` to be registered on the app.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope("/api")
            .service(health_check)
            .configure(auth::config_routes)
            .configure(media::config_routes)
            .configure(resources::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
