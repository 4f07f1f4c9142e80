use crate::entities::{booking_entity as bookings, trip_entity as trips, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::utils::{SharedClock, normalize_plate, validate_plate};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

/// Display fields as they arrive with every bot or mini-app contact
#[derive(Debug, Clone)]
pub struct TelegramProfile {
    pub telegram_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

/// Empty strings clear a field
#[derive(Debug, Clone, Default)]
pub struct VehicleUpdate {
    pub car_make: Option<String>,
    pub car_color: Option<String>,
    pub car_plate: Option<String>,
}

pub(crate) async fn find_by_telegram<C: ConnectionTrait>(
    db: &C,
    telegram_id: i64,
) -> AppResult<Option<users::Model>> {
    Ok(users::Entity::find()
        .filter(users::Column::TelegramId.eq(telegram_id))
        .one(db)
        .await?)
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
    clock: SharedClock,
}

impl UserService {
    pub fn new(pool: DatabaseConnection, clock: SharedClock) -> Self {
        Self { pool, clock }
    }

    /// Insert on first contact, otherwise refresh the display fields.
    /// `telegram_id` itself is never rewritten.
    pub async fn upsert_user(&self, profile: TelegramProfile) -> AppResult<users::Model> {
        if profile.telegram_id <= 0 {
            return Err(AppError::ValidationError(
                "telegram_id must be a positive integer".to_string(),
            ));
        }
        let now = self.clock.now();

        let am = users::ActiveModel {
            telegram_id: Set(profile.telegram_id),
            first_name: Set(profile.first_name.trim().to_string()),
            last_name: Set(clean(profile.last_name)),
            username: Set(clean(profile.username)),
            no_show_count: Set(0),
            is_blocked: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        users::Entity::insert(am)
            .on_conflict(
                OnConflict::column(users::Column::TelegramId)
                    .update_columns([
                        users::Column::FirstName,
                        users::Column::LastName,
                        users::Column::Username,
                        users::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.pool)
            .await?;

        find_by_telegram(&self.pool, profile.telegram_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn get_user(&self, telegram_id: i64) -> AppResult<users::Model> {
        find_by_telegram(&self.pool, telegram_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn update_vehicle(
        &self,
        telegram_id: i64,
        update: VehicleUpdate,
    ) -> AppResult<users::Model> {
        let user = self.get_user(telegram_id).await?;

        let mut am: users::ActiveModel = user.into();
        if let Some(make) = update.car_make {
            am.car_make = Set(clean(Some(make)));
        }
        if let Some(color) = update.car_color {
            am.car_color = Set(clean(Some(color)));
        }
        if let Some(plate) = update.car_plate {
            let plate = normalize_plate(&plate);
            if plate.is_empty() {
                am.car_plate = Set(None);
            } else {
                validate_plate(&plate)?;
                am.car_plate = Set(Some(plate));
            }
        }
        am.updated_at = Set(self.clock.now());

        let saved = am.update(&self.pool).await?;
        log::info!("Vehicle updated for user {}", saved.id);
        Ok(saved)
    }

    /// Booking history, newest first, each with its trip
    pub async fn list_passenger_bookings(
        &self,
        telegram_id: i64,
    ) -> AppResult<Vec<(bookings::Model, trips::Model)>> {
        let passenger = self.get_user(telegram_id).await?;

        let rows = bookings::Entity::find()
            .filter(bookings::Column::PassengerId.eq(passenger.id))
            .find_also_related(trips::Entity)
            .order_by_desc(bookings::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(booking, trip)| trip.map(|t| (booking, t)))
            .collect())
    }
}
