pub mod health;
pub mod location;
pub mod location_data;

use actix_web::web;

use crate::validation::query_error_handler;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .route("/", web::get().to(health::root))
        .route("/health", web::get().to(health::health))
        .route("/location", web::get().to(location::location))
        .route("/locationData", web::get().to(location_data::location_data));
}
