use crate::middlewares::CallerId;
use crate::models::*;
use crate::services::TripService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/trips",
    tag = "trip",
    request_body = CreateTripRequest,
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Trip created", body = TripResponse),
        (status = 400, description = "Invalid trip"),
        (status = 402, description = "Unpaid platform fee for today"),
        (status = 403, description = "Driver is blocked"),
        (status = 404, description = "Unknown driver")
    )
)]
pub async fn create_trip(
    trip_service: web::Data<TripService>,
    caller: CallerId,
    request: web::Json<CreateTripRequest>,
) -> Result<HttpResponse> {
    match trip_service
        .create_trip(caller.0, request.into_inner().into())
        .await
    {
        Ok(trip) => Ok(HttpResponse::Ok().json(ApiResponse::success(TripResponse::from(trip)))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/trips",
    tag = "trip",
    params(TripSearchQuery),
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Upcoming trips with free seats", body = [TripResponse])
    )
)]
pub async fn search_trips(
    trip_service: web::Data<TripService>,
    query: web::Query<TripSearchQuery>,
) -> Result<HttpResponse> {
    match trip_service.search_trips(query.into_inner().into()).await {
        Ok(list) => {
            let items: Vec<TripResponse> = list.into_iter().map(Into::into).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(items)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/trips/mine",
    tag = "trip",
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Caller's trips as a driver", body = [TripResponse])
    )
)]
pub async fn my_trips(
    trip_service: web::Data<TripService>,
    caller: CallerId,
) -> Result<HttpResponse> {
    match trip_service.list_driver_trips(caller.0).await {
        Ok(list) => {
            let items: Vec<TripResponse> = list.into_iter().map(Into::into).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(items)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/trips/{id}",
    tag = "trip",
    params(("id" = i64, Path, description = "Trip id")),
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Trip", body = TripResponse),
        (status = 404, description = "Trip not found")
    )
)]
pub async fn get_trip(
    trip_service: web::Data<TripService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match trip_service.get_trip(path.into_inner()).await {
        Ok(trip) => Ok(HttpResponse::Ok().json(ApiResponse::success(TripResponse::from(trip)))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/trips/{id}",
    tag = "trip",
    params(("id" = i64, Path, description = "Trip id")),
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Deleted trip", body = TripResponse),
        (status = 403, description = "Not the trip's driver"),
        (status = 404, description = "Trip not found"),
        (status = 409, description = "Trip has bookings or already departed")
    )
)]
pub async fn delete_trip(
    trip_service: web::Data<TripService>,
    caller: CallerId,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match trip_service
        .delete_trip_by_driver(path.into_inner(), caller.0)
        .await
    {
        Ok(trip) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            TripResponse::from(trip),
            "Trip deleted",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/trips/{id}/passengers",
    tag = "trip",
    params(("id" = i64, Path, description = "Trip id")),
    security(("telegram_id" = [])),
    responses(
        (status = 200, description = "Bookings on the trip", body = [TripPassenger]),
        (status = 403, description = "Not the trip's driver"),
        (status = 404, description = "Trip not found")
    )
)]
pub async fn trip_passengers(
    trip_service: web::Data<TripService>,
    caller: CallerId,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match trip_service
        .list_trip_passengers(path.into_inner(), caller.0)
        .await
    {
        Ok(rows) => {
            let items: Vec<TripPassenger> = rows.into_iter().map(Into::into).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(items)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn trip_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/trips")
            .route("", web::post().to(create_trip))
            .route("", web::get().to(search_trips))
            .route("/mine", web::get().to(my_trips))
            .route("/{id}", web::get().to(get_trip))
            .route("/{id}", web::delete().to(delete_trip))
            .route("/{id}/passengers", web::get().to(trip_passengers)),
    );
}
