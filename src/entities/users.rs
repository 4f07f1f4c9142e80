use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Everyone who has ever talked to the bot; drivers and passengers share this table.
/// `telegram_id` is the external identity and never changes once the row exists.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub telegram_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    /// Only ever incremented
    pub no_show_count: i32,
    pub car_make: Option<String>,
    pub car_color: Option<String>,
    pub car_plate: Option<String>,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }

    pub fn has_vehicle(&self) -> bool {
        self.car_make.is_some() || self.car_plate.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::trips::Entity")]
    Trips,
    #[sea_orm(has_many = "super::bookings::Entity")]
    Bookings,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
