use crate::entities::{BookingStatus, booking_entity, trip_entity, user_entity};
use crate::models::{TripResponse, UserSummary};
use crate::services::{BookingOutcome, NoShowOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub trip_id: i64,
    #[schema(example = 1)]
    pub seats: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingResponse {
    pub id: i64,
    pub trip_id: i64,
    pub passenger_id: i64,
    pub seats_booked: i32,
    pub total_amount: i64,
    pub driver_amount: i64,
    pub platform_fee: i64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<booking_entity::Model> for BookingResponse {
    fn from(m: booking_entity::Model) -> Self {
        Self {
            id: m.id,
            trip_id: m.trip_id,
            passenger_id: m.passenger_id,
            seats_booked: m.seats_booked,
            total_amount: m.total_amount,
            driver_amount: m.driver_amount,
            platform_fee: m.platform_fee,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingCreatedResponse {
    pub booking: BookingResponse,
    pub trip: TripResponse,
    pub passenger: UserSummary,
}

impl From<BookingOutcome> for BookingCreatedResponse {
    fn from(o: BookingOutcome) -> Self {
        Self {
            passenger: UserSummary::from(&o.passenger),
            booking: o.booking.into(),
            trip: o.trip.into(),
        }
    }
}

/// Passenger's booking history entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingWithTrip {
    pub booking: BookingResponse,
    pub trip: TripResponse,
}

impl From<(booking_entity::Model, trip_entity::Model)> for BookingWithTrip {
    fn from((booking, trip): (booking_entity::Model, trip_entity::Model)) -> Self {
        Self {
            booking: booking.into(),
            trip: trip.into(),
        }
    }
}

/// Driver's view of one booking on their trip
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TripPassenger {
    pub booking: BookingResponse,
    pub passenger: UserSummary,
}

impl From<(booking_entity::Model, user_entity::Model)> for TripPassenger {
    fn from((booking, passenger): (booking_entity::Model, user_entity::Model)) -> Self {
        Self {
            passenger: UserSummary::from(&passenger),
            booking: booking.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NoShowResponse {
    pub booking_id: i64,
    /// False when the booking had already been marked
    pub newly_marked: bool,
}

impl NoShowResponse {
    pub fn new(booking_id: i64, outcome: NoShowOutcome) -> Self {
        Self {
            booking_id,
            newly_marked: outcome == NoShowOutcome::Marked,
        }
    }
}
