use crate::middlewares::CallerId;
use crate::models::*;
use crate::services::PlanService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/plans",
    tag = "plan",
    request_body = CreatePlanRequest,
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Ride request posted", body = PlanResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Unknown passenger")
    )
)]
pub async fn create_plan(
    plan_service: web::Data<PlanService>,
    caller: CallerId,
    request: web::Json<CreatePlanRequest>,
) -> Result<HttpResponse> {
    match plan_service
        .create_plan(caller.0, request.into_inner().into())
        .await
    {
        Ok(plan) => Ok(HttpResponse::Ok().json(ApiResponse::success(PlanResponse::from(plan)))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/plans",
    tag = "plan",
    params(PlanSearchQuery),
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Open ride requests", body = [PlanResponse])
    )
)]
pub async fn list_plans(
    plan_service: web::Data<PlanService>,
    query: web::Query<PlanSearchQuery>,
) -> Result<HttpResponse> {
    match plan_service.list_plans(query.into_inner().into()).await {
        Ok(list) => {
            let items: Vec<PlanResponse> = list.into_iter().map(Into::into).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(items)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/plans/mine",
    tag = "plan",
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Caller's ride requests", body = [PlanResponse])
    )
)]
pub async fn my_plans(
    plan_service: web::Data<PlanService>,
    caller: CallerId,
) -> Result<HttpResponse> {
    match plan_service.list_my_plans(caller.0).await {
        Ok(list) => {
            let items: Vec<PlanResponse> = list.into_iter().map(Into::into).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(items)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/plans/{id}/cancel",
    tag = "plan",
    params(("id" = i64, Path, description = "Plan id")),
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Ride request withdrawn", body = PlanResponse),
        (status = 403, description = "Not the caller's request"),
        (status = 404, description = "Plan not found"),
        (status = 409, description = "No longer active")
    )
)]
pub async fn cancel_plan(
    plan_service: web::Data<PlanService>,
    caller: CallerId,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match plan_service.cancel_plan(path.into_inner(), caller.0).await {
        Ok(plan) => Ok(HttpResponse::Ok().json(ApiResponse::success(PlanResponse::from(plan)))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/plans/{id}/take",
    tag = "plan",
    params(("id" = i64, Path, description = "Plan id")),
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Ride request claimed", body = PlanResponse),
        (status = 404, description = "Plan not found"),
        (status = 409, description = "Taken by someone else or no longer active")
    )
)]
pub async fn take_plan(
    plan_service: web::Data<PlanService>,
    caller: CallerId,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match plan_service.take_plan(path.into_inner(), caller.0).await {
        Ok(plan) => Ok(HttpResponse::Ok().json(ApiResponse::success(PlanResponse::from(plan)))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn plan_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/plans")
            .route("", web::post().to(create_plan))
            .route("", web::get().to(list_plans))
            .route("/mine", web::get().to(my_plans))
            .route("/{id}/cancel", web::post().to(cancel_plan))
            .route("/{id}/take", web::post().to(take_plan)),
    );
}
