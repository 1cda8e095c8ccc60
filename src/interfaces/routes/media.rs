use actix_web::web;

use crate::{handlers::media, middlewares::auth::RequireAuth};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/upload")
            .wrap(RequireAuth::all())
            .route(web::post().to(media::upload))
    );
    cfg.service(
        web::resource("/delete")
            .wrap(RequireAuth::all())
            .route(web::post().to(media::delete))
    );
}
