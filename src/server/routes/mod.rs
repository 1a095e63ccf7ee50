//! HTTP route modules

pub mod auth;
pub mod health;
pub mod modules;

use actix_web::web;

/// Register all routes on the app
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .route("/login", web::post().to(auth::login))
                .route("/logout", web::post().to(auth::logout))
                .service(
                    web::resource("/modules")
                        .route(web::get().to(modules::list_modules))
                        .route(web::post().to(modules::create_module)),
                )
                .route("/modules/tree", web::get().to(modules::module_tree))
                .route("/modules/{id}", web::delete().to(modules::delete_module))
                .service(
                    web::resource("/roles/{id}/permissions")
                        .route(web::get().to(modules::role_permissions))
                        .route(web::put().to(modules::replace_role_permissions)),
                ),
        );
}
