use actix_cors::Cors;
use actix_web::{http::header, middleware::DefaultHeaders};

use crate::settings::AppConfig;

/// Credentialed CORS for the configured origins, GET and POST only.
pub fn build_cors(config: &AppConfig) -> Cors {
    let origins = config.cors_origins();

    let cors = if origins.iter().any(|o| o == "*") {
        Cors::default().allow_any_origin()
    } else {
        origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .supports_credentials()
        .max_age(3600)
}

pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .add((header::X_FRAME_OPTIONS, "SAMEORIGIN"))
        .add((header::REFERRER_POLICY, "no-referrer"))
        .add((header::STRICT_TRANSPORT_SECURITY, "max-age=15552000; includeSubDomains"))
        .add(("X-DNS-Prefetch-Control", "off"))
        .add(("X-Permitted-Cross-Domain-Policies", "none"))
        .add(("Cross-Origin-Resource-Policy", "same-origin"))
}
