use crate::entities::trip_entity;
use crate::services::{NewTrip, TripSearch};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTripRequest {
    #[schema(example = "Bishkek")]
    pub origin: String,
    #[schema(example = "Osh")]
    pub destination: String,
    pub departure_at: DateTime<Utc>,
    #[schema(example = 3)]
    pub seats_total: i32,
    #[schema(example = 1500)]
    pub price_per_seat: i64,
    pub note: Option<String>,
}

impl From<CreateTripRequest> for NewTrip {
    fn from(r: CreateTripRequest) -> Self {
        Self {
            origin: r.origin,
            destination: r.destination,
            departure_at: r.departure_at,
            seats_total: r.seats_total,
            price_per_seat: r.price_per_seat,
            note: r.note,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TripSearchQuery {
    pub origin: Option<String>,
    pub destination: Option<String>,
    /// Local date, YYYY-MM-DD
    pub date: Option<NaiveDate>,
}

impl From<TripSearchQuery> for TripSearch {
    fn from(q: TripSearchQuery) -> Self {
        Self {
            origin: q.origin,
            destination: q.destination,
            date: q.date,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TripResponse {
    pub id: i64,
    pub driver_id: i64,
    pub origin: String,
    pub destination: String,
    pub departure_at: DateTime<Utc>,
    pub seats_total: i32,
    pub seats_available: i32,
    pub price_per_seat: i64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<trip_entity::Model> for TripResponse {
    fn from(m: trip_entity::Model) -> Self {
        Self {
            id: m.id,
            driver_id: m.driver_id,
            origin: m.origin,
            destination: m.destination,
            departure_at: m.departure_at,
            seats_total: m.seats_total,
            seats_available: m.seats_available,
            price_per_seat: m.price_per_seat,
            note: m.note,
            created_at: m.created_at,
        }
    }
}
