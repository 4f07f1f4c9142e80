use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[sea_orm(string_value = "booked")]
    Booked,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "no_show")]
    NoShow,
}

impl BookingStatus {
    /// `cancelled` and `no_show` have no outgoing transitions
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Booked)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Booked => write!(f, "booked"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::NoShow => write!(f, "no_show"),
        }
    }
}

/// A passenger's seat reservation with the money breakdown fixed at booking time
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trips::Entity",
        from = "Column::TripId",
        to = "super::trips::Column::Id"
    )]
    Trip,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::PassengerId",
        to = "super::users::Column::Id"
    )]
    Passenger,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Passenger.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
