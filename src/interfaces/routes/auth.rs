use actix_web::web;

use crate::{handlers::auth, middlewares::auth::RequireAuth};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::login)
            .service(auth::logout)
            .service(
                web::resource("/me")
                    .wrap(RequireAuth::all())
                    .route(web::get().to(auth::me))
            )
            .service(
                web::resource("/password")
                    .wrap(RequireAuth::all())
                    .route(web::put().to(auth::rotate_secret))
            )
    );
}
