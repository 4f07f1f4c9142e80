use crate::entities::{app_settings_entity, payment_proof_entity, user_entity};
use crate::models::UserSummary;
use crate::services::{DriverDayActivity, GateDecision, SettingsUpdate};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SettingsResponse {
    pub monetization_enabled: bool,
    pub payment_instructions: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<app_settings_entity::Model> for SettingsResponse {
    fn from(m: app_settings_entity::Model) -> Self {
        Self {
            monetization_enabled: m.monetization_enabled,
            payment_instructions: m.payment_instructions,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateSettingsRequest {
    pub monetization_enabled: Option<bool>,
    pub payment_instructions: Option<String>,
}

impl From<UpdateSettingsRequest> for SettingsUpdate {
    fn from(r: UpdateSettingsRequest) -> Self {
        Self {
            monetization_enabled: r.monetization_enabled,
            payment_instructions: r.payment_instructions,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BlockDriverRequest {
    pub blocked: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateQuery {
    /// Local date, YYYY-MM-DD; today when omitted
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitProofRequest {
    /// Bot file id or upload path of the receipt
    pub file_ref: String,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentProofResponse {
    pub id: i64,
    pub driver_id: i64,
    pub proof_date: NaiveDate,
    pub file_ref: String,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub driver: Option<UserSummary>,
}

impl PaymentProofResponse {
    pub fn new(m: payment_proof_entity::Model, driver: Option<&user_entity::Model>) -> Self {
        Self {
            id: m.id,
            driver_id: m.driver_id,
            proof_date: m.proof_date,
            file_ref: m.file_ref,
            comment: m.comment,
            created_at: m.created_at,
            driver: driver.map(UserSummary::from),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GateStatusResponse {
    pub allowed: bool,
    /// One of monetization_disabled, no_trips_today, no_fee_accrued, proof_submitted, unpaid_fee
    pub reason: String,
    pub fee_due: i64,
    pub date: NaiveDate,
    pub trips_today: u64,
    pub fee_today: i64,
    pub proof_submitted: bool,
}

impl GateStatusResponse {
    pub fn new(decision: GateDecision, activity: DriverDayActivity) -> Self {
        Self {
            allowed: decision.allowed,
            reason: decision.reason.as_str().to_string(),
            fee_due: decision.fee_due(),
            date: activity.date,
            trips_today: activity.trips_today,
            fee_today: activity.fee_today,
            proof_submitted: activity.proof_submitted,
        }
    }
}

/// Shown to drivers in the mini-app; no admin check
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicSettingsResponse {
    pub monetization_enabled: bool,
    pub payment_instructions: String,
}
