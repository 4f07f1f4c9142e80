use actix_web::{HttpResponse, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION")
        }
    })))
}

pub fn health_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
