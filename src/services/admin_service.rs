use crate::entities::{
    app_settings_entity as settings, payment_proof_entity as proofs, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::notifications::{NotificationEvent, NotificationSender};
use crate::services::{
    DriverFeeSummary, MonetizationService, SettingsService, SettingsUpdate,
    user_service::find_by_telegram,
};
use crate::utils::SharedClock;
use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Operations reserved for the single configured administrator.
/// Every method takes the caller's telegram id and checks it first.
#[derive(Clone)]
pub struct AdminService {
    pool: DatabaseConnection,
    clock: SharedClock,
    notifications: NotificationSender,
    settings: SettingsService,
    monetization: MonetizationService,
    admin_telegram_id: i64,
}

impl AdminService {
    pub fn new(
        pool: DatabaseConnection,
        clock: SharedClock,
        notifications: NotificationSender,
        settings: SettingsService,
        monetization: MonetizationService,
        admin_telegram_id: i64,
    ) -> Self {
        Self {
            pool,
            clock,
            notifications,
            settings,
            monetization,
            admin_telegram_id,
        }
    }

    pub fn is_admin(&self, telegram_id: i64) -> bool {
        self.admin_telegram_id != 0 && telegram_id == self.admin_telegram_id
    }

    fn ensure_admin(&self, telegram_id: i64) -> AppResult<()> {
        if self.is_admin(telegram_id) {
            Ok(())
        } else {
            Err(AppError::AdminOnly)
        }
    }

    pub async fn get_settings(&self, caller: i64) -> AppResult<settings::Model> {
        self.ensure_admin(caller)?;
        self.settings.load().await
    }

    pub async fn update_settings(
        &self,
        caller: i64,
        update: SettingsUpdate,
    ) -> AppResult<settings::Model> {
        self.ensure_admin(caller)?;
        self.settings.update(update).await
    }

    pub async fn set_driver_blocked(
        &self,
        caller: i64,
        driver_telegram_id: i64,
        blocked: bool,
    ) -> AppResult<users::Model> {
        self.ensure_admin(caller)?;
        let driver = find_by_telegram(&self.pool, driver_telegram_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let changed = users::Entity::update_many()
            .col_expr(users::Column::IsBlocked, Expr::value(blocked))
            .col_expr(users::Column::UpdatedAt, Expr::value(self.clock.now()))
            .filter(users::Column::Id.eq(driver.id))
            .filter(users::Column::IsBlocked.eq(!blocked))
            .exec(&self.pool)
            .await?;

        let driver = users::Entity::find_by_id(driver.id)
            .one(&self.pool)
            .await?
            .ok_or(AppError::UserNotFound)?;

        // Repeating the same request is a quiet no-op
        if changed.rows_affected > 0 {
            log::info!(
                "Driver {} {} by administrator",
                driver.id,
                if blocked { "blocked" } else { "unblocked" }
            );
            self.notifications.emit(NotificationEvent::DriverBlockChanged {
                driver_chat_id: driver.telegram_id,
                blocked,
            });
        }
        Ok(driver)
    }

    pub async fn list_payment_proofs(
        &self,
        caller: i64,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<(proofs::Model, Option<users::Model>)>> {
        self.ensure_admin(caller)?;
        let date = date.unwrap_or_else(|| self.monetization.local_today());
        self.monetization.list_proofs(date).await
    }

    pub async fn daily_fee_report(
        &self,
        caller: i64,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<DriverFeeSummary>> {
        self.ensure_admin(caller)?;
        let date = date.unwrap_or_else(|| self.monetization.local_today());
        self.monetization.daily_fee_report(date).await
    }
}
