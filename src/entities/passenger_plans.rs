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
pub enum PlanStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "taken")]
    Taken,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "expired")]
    Expired,
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanStatus::Active => write!(f, "active"),
            PlanStatus::Taken => write!(f, "taken"),
            PlanStatus::Cancelled => write!(f, "cancelled"),
            PlanStatus::Expired => write!(f, "expired"),
        }
    }
}

/// A passenger's standing ride request.
/// `driver_id` is set exactly once, by the claim that moves the plan to `taken`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "passenger_plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub passenger_id: i64,
    pub origin: String,
    pub destination: String,
    pub desired_at: DateTime<Utc>,
    pub seats_needed: i32,
    pub note: Option<String>,
    pub status: PlanStatus,
    pub driver_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Two references to users (passenger and driver); joins are done explicitly
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
