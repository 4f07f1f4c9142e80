use crate::config::BookingConfig;
use crate::entities::{PlanStatus, plan_entity as plans, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::notifications::{NotificationEvent, NotificationSender};
use crate::services::user_service::find_by_telegram;
use crate::utils::{SharedClock, place_matches, validate_route};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

#[derive(Debug, Clone)]
pub struct NewPlan {
    pub origin: String,
    pub destination: String,
    pub desired_at: DateTime<Utc>,
    pub seats_needed: i32,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PlanSearch {
    pub origin: Option<String>,
    pub destination: Option<String>,
}

#[derive(Clone)]
pub struct PlanService {
    pool: DatabaseConnection,
    clock: SharedClock,
    notifications: NotificationSender,
    config: BookingConfig,
}

impl PlanService {
    pub fn new(
        pool: DatabaseConnection,
        clock: SharedClock,
        notifications: NotificationSender,
        config: BookingConfig,
    ) -> Self {
        Self {
            pool,
            clock,
            notifications,
            config,
        }
    }

    pub async fn create_plan(
        &self,
        passenger_telegram_id: i64,
        new: NewPlan,
    ) -> AppResult<plans::Model> {
        let now = self.clock.now();
        let (origin, destination) = validate_route(&new.origin, &new.destination)?;
        if new.seats_needed < 1 || new.seats_needed > self.config.max_seats_per_trip {
            return Err(AppError::ValidationError(format!(
                "Seats must be between 1 and {}",
                self.config.max_seats_per_trip
            )));
        }
        if new.desired_at <= now {
            return Err(AppError::ValidationError(
                "Desired time must be in the future".to_string(),
            ));
        }

        let passenger = find_by_telegram(&self.pool, passenger_telegram_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let plan = plans::ActiveModel {
            passenger_id: Set(passenger.id),
            origin: Set(origin),
            destination: Set(destination),
            desired_at: Set(new.desired_at),
            seats_needed: Set(new.seats_needed),
            note: Set(new
                .note
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())),
            status: Set(PlanStatus::Active),
            driver_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Plan {} created by passenger {}", plan.id, passenger.id);
        Ok(plan)
    }

    pub async fn get_plan(&self, plan_id: i64) -> AppResult<plans::Model> {
        plans::Entity::find_by_id(plan_id)
            .one(&self.pool)
            .await?
            .ok_or(AppError::PlanNotFound)
    }

    /// Open requests drivers can still claim, soonest first
    pub async fn list_plans(&self, search: PlanSearch) -> AppResult<Vec<plans::Model>> {
        let list = plans::Entity::find()
            .filter(plans::Column::Status.eq(PlanStatus::Active))
            .filter(plans::Column::DesiredAt.gt(self.clock.now()))
            .order_by_asc(plans::Column::DesiredAt)
            .all(&self.pool)
            .await?;

        Ok(list
            .into_iter()
            .filter(|p| {
                search
                    .origin
                    .as_deref()
                    .is_none_or(|o| place_matches(&p.origin, o))
                    && search
                        .destination
                        .as_deref()
                        .is_none_or(|d| place_matches(&p.destination, d))
            })
            .collect())
    }

    pub async fn list_my_plans(&self, passenger_telegram_id: i64) -> AppResult<Vec<plans::Model>> {
        let passenger = find_by_telegram(&self.pool, passenger_telegram_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        Ok(plans::Entity::find()
            .filter(plans::Column::PassengerId.eq(passenger.id))
            .order_by_desc(plans::Column::DesiredAt)
            .all(&self.pool)
            .await?)
    }

    pub async fn cancel_plan(
        &self,
        plan_id: i64,
        passenger_telegram_id: i64,
    ) -> AppResult<plans::Model> {
        let now = self.clock.now();
        let txn = self.pool.begin().await?;

        let plan = plans::Entity::find_by_id(plan_id)
            .one(&txn)
            .await?
            .ok_or(AppError::PlanNotFound)?;
        let caller = find_by_telegram(&txn, passenger_telegram_id).await?;
        if caller.map(|u| u.id) != Some(plan.passenger_id) {
            return Err(AppError::Forbidden);
        }
        if plan.status != PlanStatus::Active {
            return Err(AppError::PlanUnavailable);
        }
        if plan.desired_at <= now {
            return Err(AppError::TooLate);
        }

        let result = plans::Entity::update_many()
            .col_expr(plans::Column::Status, Expr::value(PlanStatus::Cancelled))
            .col_expr(plans::Column::UpdatedAt, Expr::value(now))
            .filter(plans::Column::Id.eq(plan.id))
            .filter(plans::Column::Status.eq(PlanStatus::Active))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::PlanUnavailable);
        }

        let plan = plans::Entity::find_by_id(plan.id)
            .one(&txn)
            .await?
            .ok_or(AppError::PlanNotFound)?;
        txn.commit().await?;

        log::info!("Plan {} cancelled by its passenger", plan.id);
        Ok(plan)
    }

    /// First claim wins; every other driver gets `AlreadyTaken`.
    ///
    /// The precondition read and the claim are separate statements. The
    /// claim's `status = 'active'` filter alone decides the winner.
    pub async fn take_plan(&self, plan_id: i64, driver_telegram_id: i64) -> AppResult<plans::Model> {
        let now = self.clock.now();
        let (plan, driver) = self.check_take(plan_id, driver_telegram_id, now).await?;
        let plan = self.claim(&plan, &driver, now).await?;

        log::info!("Plan {} taken by driver {}", plan.id, driver.id);

        let passenger = users::Entity::find_by_id(plan.passenger_id)
            .one(&self.pool)
            .await?;
        if let Some(passenger) = passenger {
            self.notifications.emit(NotificationEvent::PlanTaken {
                passenger_chat_id: passenger.telegram_id,
                driver_name: driver.display_name(),
                driver_username: driver.username.clone(),
                origin: plan.origin.clone(),
                destination: plan.destination.clone(),
                desired_at: plan.desired_at,
            });
        }

        Ok(plan)
    }

    async fn check_take(
        &self,
        plan_id: i64,
        driver_telegram_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<(plans::Model, users::Model)> {
        let plan = plans::Entity::find_by_id(plan_id)
            .one(&self.pool)
            .await?
            .ok_or(AppError::PlanNotFound)?;
        match plan.status {
            PlanStatus::Active => {}
            // another driver already won
            PlanStatus::Taken => return Err(AppError::AlreadyTaken),
            PlanStatus::Cancelled | PlanStatus::Expired => {
                return Err(AppError::PlanUnavailable);
            }
        }
        if plan.desired_at <= now {
            return Err(AppError::TooLate);
        }
        let driver = find_by_telegram(&self.pool, driver_telegram_id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        if driver.id == plan.passenger_id {
            return Err(AppError::ValidationError(
                "You cannot take your own ride request".to_string(),
            ));
        }
        Ok((plan, driver))
    }

    /// Conditional claim of a plan last seen as active
    async fn claim(
        &self,
        plan: &plans::Model,
        driver: &users::Model,
        now: DateTime<Utc>,
    ) -> AppResult<plans::Model> {
        let claimed = plans::Entity::update_many()
            .col_expr(plans::Column::Status, Expr::value(PlanStatus::Taken))
            .col_expr(plans::Column::DriverId, Expr::value(driver.id))
            .col_expr(plans::Column::UpdatedAt, Expr::value(now))
            .filter(plans::Column::Id.eq(plan.id))
            .filter(plans::Column::Status.eq(PlanStatus::Active))
            .exec(&self.pool)
            .await?;
        if claimed.rows_affected == 0 {
            log::info!("Driver {} lost the claim on plan {}", driver.id, plan.id);
            return Err(AppError::AlreadyTaken);
        }

        plans::Entity::find_by_id(plan.id)
            .one(&self.pool)
            .await?
            .ok_or(AppError::PlanNotFound)
    }

    /// Move active plans whose time has passed to `expired`; returns how many
    pub async fn expire_plans(&self) -> AppResult<u64> {
        let now = self.clock.now();
        let result = plans::Entity::update_many()
            .col_expr(plans::Column::Status, Expr::value(PlanStatus::Expired))
            .col_expr(plans::Column::UpdatedAt, Expr::value(now))
            .filter(plans::Column::Status.eq(PlanStatus::Active))
            .filter(plans::Column::DesiredAt.lte(now))
            .exec(&self.pool)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::database::{create_pool, run_migrations};
    use crate::services::{TelegramProfile, UserService};
    use crate::utils::{Clock, ManualClock};
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;

    async fn service() -> (PlanService, UserService, Arc<ManualClock>) {
        let pool = create_pool(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
        .unwrap();
        run_migrations(&pool).await.unwrap();
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 5, 1, 6, 0, 0).unwrap(),
        ));
        let shared: SharedClock = clock.clone();
        let (notifications, _events) = NotificationSender::channel();
        let plans = PlanService::new(
            pool.clone(),
            shared.clone(),
            notifications,
            BookingConfig::default(),
        );
        (plans, UserService::new(pool, shared), clock)
    }

    async fn user(accounts: &UserService, telegram_id: i64) -> users::Model {
        accounts
            .upsert_user(TelegramProfile {
                telegram_id,
                first_name: format!("User {telegram_id}"),
                last_name: None,
                username: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_claim_of_stale_active_plan_is_already_taken() {
        let (plans, accounts, clock) = service().await;
        user(&accounts, 100).await;
        let late = user(&accounts, 201).await;
        user(&accounts, 202).await;

        let plan = plans
            .create_plan(
                100,
                NewPlan {
                    origin: "Bishkek".to_string(),
                    destination: "Karakol".to_string(),
                    desired_at: clock.now() + Duration::hours(4),
                    seats_needed: 1,
                    note: None,
                },
            )
            .await
            .unwrap();

        // Driver 201 passed its checks against the active plan...
        let (seen, driver) = plans.check_take(plan.id, 201, clock.now()).await.unwrap();
        assert_eq!(seen.status, PlanStatus::Active);
        assert_eq!(driver.id, late.id);

        // ...but 202 commits its claim first
        let winner = plans.take_plan(plan.id, 202).await.unwrap();
        assert_eq!(winner.status, PlanStatus::Taken);

        let err = plans.claim(&seen, &driver, clock.now()).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyTaken));

        let stored = plans.get_plan(plan.id).await.unwrap();
        assert_eq!(stored.driver_id, winner.driver_id);
        assert_ne!(stored.driver_id, Some(late.id));
    }
}
