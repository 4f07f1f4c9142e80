//! Commission gate consulted before a driver may post another trip.
//!
//! A driver owes the platform fee of every non-cancelled booking created on
//! their trips during the local day. Once they have posted at least one trip
//! and accrued a non-zero fee, further trips are refused until a payment proof
//! for that day is on file. The counters restart with each local day.

use crate::entities::{
    BookingStatus, app_settings_entity as settings, booking_entity as bookings,
    payment_proof_entity as proofs, trip_entity as trips, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::notifications::{NotificationEvent, NotificationSender};
use crate::services::settings_service::load_settings;
use crate::services::user_service::find_by_telegram;
use crate::utils::{LocalDay, SharedClock, day_bounds, today};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use std::collections::BTreeSet;
use utoipa::ToSchema;

/// What a driver did during one local day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverDayActivity {
    pub date: NaiveDate,
    pub trips_today: u64,
    pub fee_today: i64,
    pub proof_submitted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum GateReason {
    MonetizationDisabled,
    NoTripsToday,
    NoFeeAccrued,
    ProofSubmitted,
    UnpaidFee { fee_due: i64 },
}

impl GateReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateReason::MonetizationDisabled => "monetization_disabled",
            GateReason::NoTripsToday => "no_trips_today",
            GateReason::NoFeeAccrued => "no_fee_accrued",
            GateReason::ProofSubmitted => "proof_submitted",
            GateReason::UnpaidFee { .. } => "unpaid_fee",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateDecision {
    pub allowed: bool,
    #[serde(flatten)]
    pub reason: GateReason,
}

impl GateDecision {
    fn allow(reason: GateReason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    pub fn fee_due(&self) -> i64 {
        match self.reason {
            GateReason::UnpaidFee { fee_due } => fee_due,
            _ => 0,
        }
    }

    pub fn into_result(self) -> AppResult<()> {
        if self.allowed {
            Ok(())
        } else {
            Err(AppError::PaymentRequired {
                fee_due: self.fee_due(),
            })
        }
    }
}

pub fn evaluate_gate(settings: &settings::Model, activity: &DriverDayActivity) -> GateDecision {
    if !settings.monetization_enabled {
        return GateDecision::allow(GateReason::MonetizationDisabled);
    }
    if activity.trips_today == 0 {
        return GateDecision::allow(GateReason::NoTripsToday);
    }
    if activity.fee_today <= 0 {
        return GateDecision::allow(GateReason::NoFeeAccrued);
    }
    if activity.proof_submitted {
        return GateDecision::allow(GateReason::ProofSubmitted);
    }
    GateDecision {
        allowed: false,
        reason: GateReason::UnpaidFee {
            fee_due: activity.fee_today,
        },
    }
}

#[derive(Debug, FromQueryResult)]
struct FeeRow {
    fee: Option<i64>,
}

pub(crate) async fn driver_activity<C: ConnectionTrait>(
    db: &C,
    driver_id: i64,
    day: LocalDay,
) -> AppResult<DriverDayActivity> {
    let trips_today = trips::Entity::find()
        .filter(trips::Column::DriverId.eq(driver_id))
        .filter(trips::Column::CreatedAt.gte(day.start_utc))
        .filter(trips::Column::CreatedAt.lt(day.end_utc))
        .count(db)
        .await?;

    let fee_today = bookings::Entity::find()
        .inner_join(trips::Entity)
        .filter(trips::Column::DriverId.eq(driver_id))
        .filter(bookings::Column::Status.ne(BookingStatus::Cancelled))
        .filter(bookings::Column::CreatedAt.gte(day.start_utc))
        .filter(bookings::Column::CreatedAt.lt(day.end_utc))
        .select_only()
        .column_as(Expr::col(bookings::Column::PlatformFee).sum(), "fee")
        .into_model::<FeeRow>()
        .one(db)
        .await?
        .and_then(|r| r.fee)
        .unwrap_or(0);

    let proof_count = proofs::Entity::find()
        .filter(proofs::Column::DriverId.eq(driver_id))
        .filter(proofs::Column::ProofDate.eq(day.date))
        .count(db)
        .await?;

    Ok(DriverDayActivity {
        date: day.date,
        trips_today,
        fee_today,
        proof_submitted: proof_count > 0,
    })
}

/// Gate decision for `driver_id` at `now`, evaluated against `db`
pub(crate) async fn gate_for_driver<C: ConnectionTrait>(
    db: &C,
    driver_id: i64,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> AppResult<(GateDecision, DriverDayActivity)> {
    let settings = load_settings(db).await?;
    let activity = driver_activity(db, driver_id, today(now, offset)).await?;
    Ok((evaluate_gate(&settings, &activity), activity))
}

/// One line of the administrator's daily report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DriverFeeSummary {
    pub driver_id: i64,
    pub telegram_id: i64,
    pub driver_name: String,
    pub trips_created: u64,
    pub fee_accrued: i64,
    pub proof_submitted: bool,
}

#[derive(Clone)]
pub struct MonetizationService {
    pool: DatabaseConnection,
    clock: SharedClock,
    notifications: NotificationSender,
    offset: FixedOffset,
    admin_telegram_id: i64,
}

impl MonetizationService {
    pub fn new(
        pool: DatabaseConnection,
        clock: SharedClock,
        notifications: NotificationSender,
        offset: FixedOffset,
        admin_telegram_id: i64,
    ) -> Self {
        Self {
            pool,
            clock,
            notifications,
            offset,
            admin_telegram_id,
        }
    }

    pub fn local_today(&self) -> NaiveDate {
        today(self.clock.now(), self.offset).date
    }

    pub async fn check_gate(
        &self,
        driver_telegram_id: i64,
    ) -> AppResult<(GateDecision, DriverDayActivity)> {
        let driver = find_by_telegram(&self.pool, driver_telegram_id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        gate_for_driver(&self.pool, driver.id, self.clock.now(), self.offset).await
    }

    /// Append a receipt for the driver's current local day
    pub async fn record_payment_proof(
        &self,
        driver_telegram_id: i64,
        file_ref: &str,
        comment: Option<String>,
    ) -> AppResult<proofs::Model> {
        let file_ref = file_ref.trim();
        if file_ref.is_empty() {
            return Err(AppError::ValidationError(
                "file_ref must not be empty".to_string(),
            ));
        }
        let driver = find_by_telegram(&self.pool, driver_telegram_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let now = self.clock.now();
        let proof = proofs::ActiveModel {
            driver_id: Set(driver.id),
            proof_date: Set(today(now, self.offset).date),
            file_ref: Set(file_ref.to_string()),
            comment: Set(comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Payment proof {} recorded for driver {} on {}",
            proof.id,
            driver.id,
            proof.proof_date
        );

        if self.admin_telegram_id != 0 {
            self.notifications
                .emit(NotificationEvent::PaymentProofSubmitted {
                    admin_chat_id: self.admin_telegram_id,
                    driver_name: driver.display_name(),
                    driver_telegram_id: driver.telegram_id,
                    proof_date: proof.proof_date,
                    file_ref: proof.file_ref.clone(),
                });
        }

        Ok(proof)
    }

    pub async fn list_proofs(
        &self,
        date: NaiveDate,
    ) -> AppResult<Vec<(proofs::Model, Option<users::Model>)>> {
        Ok(proofs::Entity::find()
            .filter(proofs::Column::ProofDate.eq(date))
            .find_also_related(users::Entity)
            .order_by_asc(proofs::Column::CreatedAt)
            .all(&self.pool)
            .await?)
    }

    /// Every driver who posted a trip or accrued a fee on `date`
    pub async fn daily_fee_report(&self, date: NaiveDate) -> AppResult<Vec<DriverFeeSummary>> {
        let day = day_bounds(date, self.offset);

        let mut driver_ids: BTreeSet<i64> = trips::Entity::find()
            .filter(trips::Column::CreatedAt.gte(day.start_utc))
            .filter(trips::Column::CreatedAt.lt(day.end_utc))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|t| t.driver_id)
            .collect();

        let booked_on = bookings::Entity::find()
            .filter(bookings::Column::Status.ne(BookingStatus::Cancelled))
            .filter(bookings::Column::CreatedAt.gte(day.start_utc))
            .filter(bookings::Column::CreatedAt.lt(day.end_utc))
            .find_also_related(trips::Entity)
            .all(&self.pool)
            .await?;
        driver_ids.extend(booked_on.into_iter().filter_map(|(_, t)| t.map(|t| t.driver_id)));

        let mut report = Vec::with_capacity(driver_ids.len());
        for driver_id in driver_ids {
            let Some(driver) = users::Entity::find_by_id(driver_id).one(&self.pool).await? else {
                continue;
            };
            let activity = driver_activity(&self.pool, driver_id, day).await?;
            report.push(DriverFeeSummary {
                driver_id,
                telegram_id: driver.telegram_id,
                driver_name: driver.display_name(),
                trips_created: activity.trips_today,
                fee_accrued: activity.fee_today,
                proof_submitted: activity.proof_submitted,
            });
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(enabled: bool) -> settings::Model {
        settings::Model {
            id: 1,
            monetization_enabled: enabled,
            payment_instructions: String::new(),
            updated_at: None,
        }
    }

    fn activity(trips: u64, fee: i64, proof: bool) -> DriverDayActivity {
        DriverDayActivity {
            date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            trips_today: trips,
            fee_today: fee,
            proof_submitted: proof,
        }
    }

    #[test]
    fn test_disabled_always_allows() {
        let d = evaluate_gate(&settings(false), &activity(5, 500, false));
        assert!(d.allowed);
        assert_eq!(d.reason, GateReason::MonetizationDisabled);
    }

    #[test]
    fn test_gate_decision_table() {
        let on = settings(true);
        assert_eq!(
            evaluate_gate(&on, &activity(0, 0, false)).reason,
            GateReason::NoTripsToday
        );
        // fee can only come from earlier trips, but the first trip of the day is free
        assert_eq!(
            evaluate_gate(&on, &activity(0, 80, false)).reason,
            GateReason::NoTripsToday
        );
        assert_eq!(
            evaluate_gate(&on, &activity(2, 0, false)).reason,
            GateReason::NoFeeAccrued
        );
        assert_eq!(
            evaluate_gate(&on, &activity(1, 50, true)).reason,
            GateReason::ProofSubmitted
        );

        let denied = evaluate_gate(&on, &activity(1, 50, false));
        assert!(!denied.allowed);
        assert_eq!(denied.reason, GateReason::UnpaidFee { fee_due: 50 });
        assert!(matches!(
            denied.into_result(),
            Err(AppError::PaymentRequired { fee_due: 50 })
        ));
    }

    #[test]
    fn test_decision_serializes_flat() {
        let denied = evaluate_gate(&settings(true), &activity(1, 50, false));
        let v = serde_json::to_value(denied).unwrap();
        assert_eq!(v["allowed"], false);
        assert_eq!(v["reason"], "unpaid_fee");
        assert_eq!(v["fee_due"], 50);
    }
}
