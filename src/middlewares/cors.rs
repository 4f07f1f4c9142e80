use actix_cors::Cors;

use super::identity::IDENTITY_HEADER;

/// The mini-app is served from Telegram's web view on a different origin
pub fn create_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec!["content-type", "accept"])
        .allowed_header(IDENTITY_HEADER)
        .max_age(3600)
}
