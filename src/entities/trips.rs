use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// A driver-posted journey.
///
/// `seats_total` is fixed at creation. `seats_available` is only changed by the
/// booking engine with conditional updates, and always stays within
/// `0..=seats_total`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub driver_id: i64,
    pub origin: String,
    pub destination: String,
    pub departure_at: DateTime<Utc>,
    pub seats_total: i32,
    pub seats_available: i32,
    /// Whole currency units
    pub price_per_seat: i64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Model {
    /// Trips can only be booked, cancelled against or deleted strictly before departure
    pub fn has_departed(&self, now: DateTime<Utc>) -> bool {
        now >= self.departure_at
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::DriverId",
        to = "super::users::Column::Id"
    )]
    Driver,
    #[sea_orm(has_many = "super::bookings::Entity")]
    Bookings,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Driver.def()
    }
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
