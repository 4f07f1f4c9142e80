use crate::middlewares::CallerId;
use crate::models::*;
use crate::services::{MonetizationService, SettingsService};
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/monetization/gate",
    tag = "monetization",
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Whether the caller may post another trip today", body = GateStatusResponse),
        (status = 404, description = "Unknown driver")
    )
)]
pub async fn gate_status(
    monetization_service: web::Data<MonetizationService>,
    caller: CallerId,
) -> Result<HttpResponse> {
    match monetization_service.check_gate(caller.0).await {
        Ok((decision, activity)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            GateStatusResponse::new(decision, activity),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/monetization/proofs",
    tag = "monetization",
    request_body = SubmitProofRequest,
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Proof recorded for today", body = PaymentProofResponse),
        (status = 400, description = "Missing file reference"),
        (status = 404, description = "Unknown driver")
    )
)]
pub async fn submit_proof(
    monetization_service: web::Data<MonetizationService>,
    caller: CallerId,
    request: web::Json<SubmitProofRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    match monetization_service
        .record_payment_proof(caller.0, &request.file_ref, request.comment)
        .await
    {
        Ok(proof) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            PaymentProofResponse::new(proof, None),
            "Payment proof received",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/settings/public",
    tag = "monetization",
    responses(
        (status = 200, description = "Monetization flag and payment instructions", body = PublicSettingsResponse)
    )
)]
pub async fn public_settings(
    settings_service: web::Data<SettingsService>,
) -> Result<HttpResponse> {
    match settings_service.load().await {
        Ok(s) => Ok(HttpResponse::Ok().json(ApiResponse::success(PublicSettingsResponse {
            monetization_enabled: s.monetization_enabled,
            payment_instructions: s.payment_instructions,
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn monetization_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/settings/public", web::get().to(public_settings))
        .service(
            web::scope("/monetization")
                .route("/gate", web::get().to(gate_status))
                .route("/proofs", web::post().to(submit_proof)),
        );
}
