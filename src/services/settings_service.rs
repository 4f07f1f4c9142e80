use crate::entities::app_settings_entity::{self as settings, SETTINGS_ROW_ID};
use crate::error::{AppError, AppResult};
use crate::utils::SharedClock;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set};

/// Partial update; `None` leaves the field as is
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub monetization_enabled: Option<bool>,
    pub payment_instructions: Option<String>,
}

/// Read the global settings row. Usable inside a transaction.
pub(crate) async fn load_settings<C: ConnectionTrait>(db: &C) -> AppResult<settings::Model> {
    settings::Entity::find_by_id(SETTINGS_ROW_ID)
        .one(db)
        .await?
        .ok_or_else(|| AppError::InternalError("app_settings row is missing".to_string()))
}

#[derive(Clone)]
pub struct SettingsService {
    pool: DatabaseConnection,
    clock: SharedClock,
}

impl SettingsService {
    pub fn new(pool: DatabaseConnection, clock: SharedClock) -> Self {
        Self { pool, clock }
    }

    pub async fn load(&self) -> AppResult<settings::Model> {
        load_settings(&self.pool).await
    }

    /// Callers are responsible for the administrator check
    pub async fn update(&self, update: SettingsUpdate) -> AppResult<settings::Model> {
        let current = load_settings(&self.pool).await?;
        let mut am: settings::ActiveModel = current.into();
        if let Some(enabled) = update.monetization_enabled {
            am.monetization_enabled = Set(enabled);
        }
        if let Some(text) = update.payment_instructions {
            am.payment_instructions = Set(text.trim().to_string());
        }
        am.updated_at = Set(Some(self.clock.now()));
        let saved = am.update(&self.pool).await?;

        log::info!(
            "App settings updated: monetization_enabled={}",
            saved.monetization_enabled
        );
        Ok(saved)
    }
}
