use crate::entities::{PlanStatus, plan_entity};
use crate::services::{NewPlan, PlanSearch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePlanRequest {
    #[schema(example = "Osh")]
    pub origin: String,
    #[schema(example = "Jalal-Abad")]
    pub destination: String,
    pub desired_at: DateTime<Utc>,
    #[schema(example = 2)]
    pub seats_needed: i32,
    pub note: Option<String>,
}

impl From<CreatePlanRequest> for NewPlan {
    fn from(r: CreatePlanRequest) -> Self {
        Self {
            origin: r.origin,
            destination: r.destination,
            desired_at: r.desired_at,
            seats_needed: r.seats_needed,
            note: r.note,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PlanSearchQuery {
    pub origin: Option<String>,
    pub destination: Option<String>,
}

impl From<PlanSearchQuery> for PlanSearch {
    fn from(q: PlanSearchQuery) -> Self {
        Self {
            origin: q.origin,
            destination: q.destination,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlanResponse {
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
}

impl From<plan_entity::Model> for PlanResponse {
    fn from(m: plan_entity::Model) -> Self {
        Self {
            id: m.id,
            passenger_id: m.passenger_id,
            origin: m.origin,
            destination: m.destination,
            desired_at: m.desired_at,
            seats_needed: m.seats_needed,
            note: m.note,
            status: m.status,
            driver_id: m.driver_id,
            created_at: m.created_at,
        }
    }
}
