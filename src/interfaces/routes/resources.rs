use actix_web::web;

use crate::{entities::resource::Resource, handlers::resources, middlewares::auth::RequireAuth};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    for resource in Resource::ALL {
        cfg.service(
            web::scope(&format!("/{}", resource.route()))
                .app_data(web::Data::new(resource))
                .wrap(RequireAuth::writes())
                .service(
                    web::resource("")
                        .route(web::get().to(resources::list_documents))
                        .route(web::post().to(resources::create_document))
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(resources::get_document))
                        .route(web::put().to(resources::update_document))
                        .route(web::delete().to(resources::delete_document))
                )
        );
    }
}
