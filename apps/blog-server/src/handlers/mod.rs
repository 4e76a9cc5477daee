//! HTTP handlers and route configuration.

mod health;
mod posts;

use actix_web::{HttpResponse, error, web};

use blog_shared::ErrorResponse;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/v1/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::put().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post))
                    .route("/{id}/stars", web::post().to(posts::add_star))
                    .route("/{id}/stars", web::delete().to(posts::remove_star)),
            ),
    );
}

/// Malformed JSON bodies answer with a problem document instead of plain text.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let detail = err.to_string();
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(ErrorResponse::bad_request(detail)),
        )
        .into()
    })
}
