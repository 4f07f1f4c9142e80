use crate::middlewares::CallerId;
use crate::models::*;
use crate::services::UserService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/users/me",
    tag = "user",
    request_body = UpsertUserRequest,
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "User created or refreshed", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Missing identity")
    )
)]
pub async fn upsert_me(
    user_service: web::Data<UserService>,
    caller: CallerId,
    request: web::Json<UpsertUserRequest>,
) -> Result<HttpResponse> {
    let profile = request.into_inner().into_profile(caller.0);
    match user_service.upsert_user(profile).await {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(UserResponse::from(user)))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users/me",
    tag = "user",
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn get_me(
    user_service: web::Data<UserService>,
    caller: CallerId,
) -> Result<HttpResponse> {
    match user_service.get_user(caller.0).await {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(UserResponse::from(user)))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/users/me/vehicle",
    tag = "user",
    request_body = UpdateVehicleRequest,
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Vehicle updated", body = UserResponse),
        (status = 400, description = "Invalid plate"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn update_vehicle(
    user_service: web::Data<UserService>,
    caller: CallerId,
    request: web::Json<UpdateVehicleRequest>,
) -> Result<HttpResponse> {
    match user_service
        .update_vehicle(caller.0, request.into_inner().into())
        .await
    {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(UserResponse::from(user)))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users/me/bookings",
    tag = "user",
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Booking history, newest first", body = [BookingWithTrip]),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn my_bookings(
    user_service: web::Data<UserService>,
    caller: CallerId,
) -> Result<HttpResponse> {
    match user_service.list_passenger_bookings(caller.0).await {
        Ok(rows) => {
            let items: Vec<BookingWithTrip> = rows.into_iter().map(Into::into).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(items)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn user_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("/me", web::post().to(upsert_me))
            .route("/me", web::get().to(get_me))
            .route("/me/vehicle", web::put().to(update_vehicle))
            .route("/me/bookings", web::get().to(my_bookings)),
    );
}
