use crate::middlewares::CallerId;
use crate::models::*;
use crate::services::AdminService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/admin/settings",
    tag = "admin",
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Current settings", body = SettingsResponse),
        (status = 403, description = "Administrator only")
    )
)]
pub async fn get_settings(
    admin_service: web::Data<AdminService>,
    caller: CallerId,
) -> Result<HttpResponse> {
    match admin_service.get_settings(caller.0).await {
        Ok(s) => Ok(HttpResponse::Ok().json(ApiResponse::success(SettingsResponse::from(s)))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/settings",
    tag = "admin",
    request_body = UpdateSettingsRequest,
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Settings saved", body = SettingsResponse),
        (status = 403, description = "Administrator only")
    )
)]
pub async fn update_settings(
    admin_service: web::Data<AdminService>,
    caller: CallerId,
    request: web::Json<UpdateSettingsRequest>,
) -> Result<HttpResponse> {
    match admin_service
        .update_settings(caller.0, request.into_inner().into())
        .await
    {
        Ok(s) => Ok(HttpResponse::Ok().json(ApiResponse::success(SettingsResponse::from(s)))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/drivers/{telegram_id}/block",
    tag = "admin",
    params(("telegram_id" = i64, Path, description = "Driver's Telegram id")),
    request_body = BlockDriverRequest,
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Block flag set", body = UserResponse),
        (status = 403, description = "Administrator only"),
        (status = 404, description = "Unknown driver")
    )
)]
pub async fn set_driver_blocked(
    admin_service: web::Data<AdminService>,
    caller: CallerId,
    path: web::Path<i64>,
    request: web::Json<BlockDriverRequest>,
) -> Result<HttpResponse> {
    match admin_service
        .set_driver_blocked(caller.0, path.into_inner(), request.blocked)
        .await
    {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(UserResponse::from(user)))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/proofs",
    tag = "admin",
    params(DateQuery),
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Payment proofs for the day", body = [PaymentProofResponse]),
        (status = 403, description = "Administrator only")
    )
)]
pub async fn list_proofs(
    admin_service: web::Data<AdminService>,
    caller: CallerId,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse> {
    match admin_service.list_payment_proofs(caller.0, query.date).await {
        Ok(rows) => {
            let items: Vec<PaymentProofResponse> = rows
                .into_iter()
                .map(|(proof, driver)| PaymentProofResponse::new(proof, driver.as_ref()))
                .collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(items)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/reports/daily",
    tag = "admin",
    params(DateQuery),
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Per-driver trips, fees and proofs for the day"),
        (status = 403, description = "Administrator only")
    )
)]
pub async fn daily_report(
    admin_service: web::Data<AdminService>,
    caller: CallerId,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse> {
    match admin_service.daily_fee_report(caller.0, query.date).await {
        Ok(drivers) => {
            let total_fee: i64 = drivers.iter().map(|d| d.fee_accrued).sum();
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": {
                    "drivers": drivers,
                    "total_fee": total_fee
                }
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/settings", web::get().to(get_settings))
            .route("/settings", web::put().to(update_settings))
            .route("/drivers/{telegram_id}/block", web::put().to(set_driver_blocked))
            .route("/proofs", web::get().to(list_proofs))
            .route("/reports/daily", web::get().to(daily_report)),
    );
}
