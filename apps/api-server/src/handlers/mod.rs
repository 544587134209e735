//! HTTP handlers and route configuration.

mod health;
mod listings;
mod users;

use actix_web::{HttpRequest, error, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).app_data(query_config()).service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/listings")
                    .route("", web::get().to(listings::list))
                    .route("", web::post().to(listings::create))
                    .route("/{id}", web::get().to(listings::get))
                    .route("/{id}", web::put().to(listings::update))
                    .route("/{id}/publish", web::put().to(listings::publish)),
            )
            .service(
                web::scope("/users")
                    .route("", web::post().to(users::create))
                    .route("/{id}", web::get().to(users::get)),
            ),
    );
}

// Malformed bodies and query strings get the same problem+json shape as domain errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _req: &HttpRequest| {
        AppError::BadRequest(err.to_string()).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, _req: &HttpRequest| {
        AppError::BadRequest(err.to_string()).into()
    })
}
