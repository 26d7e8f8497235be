use actix_cors::Cors;

use crate::model::config::CorsConfig;

/**
 * Builds the cross-origin policy: configured origins, credentials and any request header.
 */
pub fn cors_policy(cors_config: &CorsConfig) -> Cors {
    cors_config
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}
