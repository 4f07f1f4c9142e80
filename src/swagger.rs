use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{BookingStatus, PlanStatus};
use crate::handlers;
use crate::middlewares::IDENTITY_HEADER;
use crate::models::*;
use crate::services::DriverFeeSummary;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "telegram_id",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(IDENTITY_HEADER))),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::user::upsert_me,
        handlers::user::get_me,
        handlers::user::update_vehicle,
        handlers::user::my_bookings,
        handlers::trip::create_trip,
        handlers::trip::search_trips,
        handlers::trip::my_trips,
        handlers::trip::get_trip,
        handlers::trip::delete_trip,
        handlers::trip::trip_passengers,
        handlers::booking::create_booking,
        handlers::booking::cancel_booking,
        handlers::booking::mark_no_show,
        handlers::plan::create_plan,
        handlers::plan::list_plans,
        handlers::plan::my_plans,
        handlers::plan::cancel_plan,
        handlers::plan::take_plan,
        handlers::monetization::gate_status,
        handlers::monetization::submit_proof,
        handlers::monetization::public_settings,
        handlers::admin::get_settings,
        handlers::admin::update_settings,
        handlers::admin::set_driver_blocked,
        handlers::admin::list_proofs,
        handlers::admin::daily_report,
    ),
    components(
        schemas(
            ApiErrorBody,
            UpsertUserRequest,
            UpdateVehicleRequest,
            UserResponse,
            UserSummary,
            CreateTripRequest,
            TripResponse,
            CreateBookingRequest,
            BookingResponse,
            BookingCreatedResponse,
            BookingWithTrip,
            TripPassenger,
            NoShowResponse,
            BookingStatus,
            CreatePlanRequest,
            PlanResponse,
            PlanStatus,
            GateStatusResponse,
            SubmitProofRequest,
            PaymentProofResponse,
            PublicSettingsResponse,
            SettingsResponse,
            UpdateSettingsRequest,
            BlockDriverRequest,
            DriverFeeSummary,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "system", description = "Liveness"),
        (name = "user", description = "Profiles and vehicles"),
        (name = "trip", description = "Driver trips"),
        (name = "booking", description = "Seat reservations"),
        (name = "plan", description = "Passenger ride requests"),
        (name = "monetization", description = "Platform fee gate and payment proofs"),
        (name = "admin", description = "Administrator operations"),
    ),
    info(
        title = "Poputka Backend API",
        version = "1.0.0",
        description = "Ride-sharing coordination API for the Telegram bot and mini-app"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
