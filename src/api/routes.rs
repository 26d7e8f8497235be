use actix_web::web;

use crate::{
    api::endpoints::{atensi_add, atensi_delete, atensi_get, atensi_list, atensi_update, dashboard_stats, village_get, villages_list},
    model::apperror::{ApplicationError, ErrorType},
};

/**
 * Common path prefix of every endpoint.
 */
pub const API_SCOPE: &str = "/api";

/**
 * Registers the endpoints under `/api`.
 *
 * Body and path decoding failures are answered with 400 and a plain-text message.
 */
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_SCOPE)
            .app_data(json_config())
            .app_data(path_config())
            .service(atensi_list)
            .service(atensi_get)
            .service(atensi_add)
            .service(atensi_update)
            .service(atensi_delete)
            .service(villages_list)
            .service(village_get)
            .service(dashboard_stats),
    );
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _request| {
        tracing::debug!("Rejected request body: {}", err);
        ApplicationError::new(ErrorType::BadRequest, err.to_string()).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _request| {
        tracing::debug!("Rejected path: {}", err);
        ApplicationError::new(ErrorType::BadRequest, err.to_string()).into()
    })
}
