use crate::middlewares::CallerId;
use crate::models::*;
use crate::services::BookingService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/bookings",
    tag = "booking",
    request_body = CreateBookingRequest,
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Seats reserved", body = BookingCreatedResponse),
        (status = 400, description = "Invalid seat count or own trip"),
        (status = 404, description = "Trip or passenger not found"),
        (status = 409, description = "Not enough seats or trip departed")
    )
)]
pub async fn create_booking(
    booking_service: web::Data<BookingService>,
    caller: CallerId,
    request: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    match booking_service
        .create_booking(request.trip_id, caller.0, request.seats)
        .await
    {
        Ok(outcome) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            BookingCreatedResponse::from(outcome),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/bookings/{id}/cancel",
    tag = "booking",
    params(("id" = i64, Path, description = "Booking id")),
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Booking cancelled, seats restored", body = BookingResponse),
        (status = 403, description = "Not the caller's booking"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Not cancellable")
    )
)]
pub async fn cancel_booking(
    booking_service: web::Data<BookingService>,
    caller: CallerId,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match booking_service
        .cancel_booking_by_passenger(path.into_inner(), caller.0)
        .await
    {
        Ok(booking) => Ok(HttpResponse::Ok().json(ApiResponse::success(BookingResponse::from(
            booking,
        )))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/bookings/{id}/no-show",
    tag = "booking",
    params(("id" = i64, Path, description = "Booking id")),
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Passenger marked as no-show", body = NoShowResponse),
        (status = 403, description = "Not the trip's driver"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking was cancelled")
    )
)]
pub async fn mark_no_show(
    booking_service: web::Data<BookingService>,
    caller: CallerId,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let booking_id = path.into_inner();
    match booking_service
        .mark_booking_no_show(booking_id, caller.0)
        .await
    {
        Ok(outcome) => Ok(HttpResponse::Ok().json(ApiResponse::success(NoShowResponse::new(
            booking_id, outcome,
        )))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn booking_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookings")
            .route("", web::post().to(create_booking))
            .route("/{id}/cancel", web::post().to(cancel_booking))
            .route("/{id}/no-show", web::post().to(mark_no_show)),
    );
}
