use crate::config::BookingConfig;
use crate::entities::{booking_entity as bookings, trip_entity as trips, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::services::monetization_service::gate_for_driver;
use crate::services::user_service::find_by_telegram;
use crate::utils::{SharedClock, day_bounds, offset_from_minutes, place_matches, validate_route};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

const SEARCH_LIMIT: u64 = 200;

#[derive(Debug, Clone)]
pub struct NewTrip {
    pub origin: String,
    pub destination: String,
    pub departure_at: DateTime<Utc>,
    pub seats_total: i32,
    pub price_per_seat: i64,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TripSearch {
    pub origin: Option<String>,
    pub destination: Option<String>,
    /// Local calendar day of departure
    pub date: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct TripService {
    pool: DatabaseConnection,
    clock: SharedClock,
    config: BookingConfig,
}

impl TripService {
    pub fn new(pool: DatabaseConnection, clock: SharedClock, config: BookingConfig) -> Self {
        Self {
            pool,
            clock,
            config,
        }
    }

    fn offset(&self) -> FixedOffset {
        offset_from_minutes(self.config.utc_offset_minutes)
    }

    /// Post a new trip. Blocked drivers and drivers with an unpaid fee for
    /// today are refused.
    pub async fn create_trip(&self, driver_telegram_id: i64, new: NewTrip) -> AppResult<trips::Model> {
        let now = self.clock.now();
        let (origin, destination) = validate_route(&new.origin, &new.destination)?;
        if new.seats_total < 1 || new.seats_total > self.config.max_seats_per_trip {
            return Err(AppError::ValidationError(format!(
                "Seats must be between 1 and {}",
                self.config.max_seats_per_trip
            )));
        }
        if new.price_per_seat < 0 {
            return Err(AppError::ValidationError(
                "Price per seat must not be negative".to_string(),
            ));
        }
        if new.departure_at <= now {
            return Err(AppError::ValidationError(
                "Departure time must be in the future".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;

        let driver = find_by_telegram(&txn, driver_telegram_id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        if driver.is_blocked {
            return Err(AppError::DriverBlocked);
        }

        let (decision, activity) = gate_for_driver(&txn, driver.id, now, self.offset()).await?;
        if !decision.allowed {
            log::info!(
                "Trip creation refused for driver {}: fee {} unpaid on {}",
                driver.id,
                activity.fee_today,
                activity.date
            );
        }
        decision.into_result()?;

        let trip = trips::ActiveModel {
            driver_id: Set(driver.id),
            origin: Set(origin),
            destination: Set(destination),
            departure_at: Set(new.departure_at),
            seats_total: Set(new.seats_total),
            seats_available: Set(new.seats_total),
            price_per_seat: Set(new.price_per_seat),
            note: Set(new
                .note
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        log::info!(
            "Trip {} created by driver {} ({} seats at {})",
            trip.id,
            driver.id,
            trip.seats_total,
            trip.price_per_seat
        );
        Ok(trip)
    }

    pub async fn get_trip(&self, trip_id: i64) -> AppResult<trips::Model> {
        trips::Entity::find_by_id(trip_id)
            .one(&self.pool)
            .await?
            .ok_or(AppError::TripNotFound)
    }

    /// Upcoming trips that still have free seats, soonest first
    pub async fn search_trips(&self, search: TripSearch) -> AppResult<Vec<trips::Model>> {
        let now = self.clock.now();
        let mut query = trips::Entity::find()
            .filter(trips::Column::DepartureAt.gt(now))
            .filter(trips::Column::SeatsAvailable.gt(0));

        if let Some(date) = search.date {
            let day = day_bounds(date, self.offset());
            query = query
                .filter(trips::Column::DepartureAt.gte(day.start_utc))
                .filter(trips::Column::DepartureAt.lt(day.end_utc));
        }

        let list = query
            .order_by_asc(trips::Column::DepartureAt)
            .limit(SEARCH_LIMIT)
            .all(&self.pool)
            .await?;

        // Unicode-aware matching happens here; SQLite's LIKE only folds ASCII
        Ok(list
            .into_iter()
            .filter(|t| {
                search
                    .origin
                    .as_deref()
                    .is_none_or(|o| place_matches(&t.origin, o))
                    && search
                        .destination
                        .as_deref()
                        .is_none_or(|d| place_matches(&t.destination, d))
            })
            .collect())
    }

    pub async fn list_driver_trips(&self, driver_telegram_id: i64) -> AppResult<Vec<trips::Model>> {
        let driver = find_by_telegram(&self.pool, driver_telegram_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        Ok(trips::Entity::find()
            .filter(trips::Column::DriverId.eq(driver.id))
            .order_by_desc(trips::Column::DepartureAt)
            .all(&self.pool)
            .await?)
    }

    /// Bookings of every status on a trip, for its driver only
    pub async fn list_trip_passengers(
        &self,
        trip_id: i64,
        driver_telegram_id: i64,
    ) -> AppResult<Vec<(bookings::Model, users::Model)>> {
        let trip = self.get_trip(trip_id).await?;
        let caller = find_by_telegram(&self.pool, driver_telegram_id).await?;
        if caller.map(|u| u.id) != Some(trip.driver_id) {
            return Err(AppError::Forbidden);
        }

        let rows = bookings::Entity::find()
            .filter(bookings::Column::TripId.eq(trip.id))
            .find_also_related(users::Entity)
            .order_by_asc(bookings::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(booking, passenger)| passenger.map(|p| (booking, p)))
            .collect())
    }

    /// Remove a trip that never had a booking, before it departs.
    /// Returns the deleted row.
    pub async fn delete_trip_by_driver(
        &self,
        trip_id: i64,
        driver_telegram_id: i64,
    ) -> AppResult<trips::Model> {
        let now = self.clock.now();
        let txn = self.pool.begin().await?;

        let trip = trips::Entity::find_by_id(trip_id)
            .one(&txn)
            .await?
            .ok_or(AppError::TripNotFound)?;
        let caller = find_by_telegram(&txn, driver_telegram_id).await?;
        if caller.map(|u| u.id) != Some(trip.driver_id) {
            return Err(AppError::Forbidden);
        }
        if trip.has_departed(now) {
            return Err(AppError::TooLate);
        }

        let has_bookings = bookings::Entity::find()
            .filter(bookings::Column::TripId.eq(trip.id))
            .one(&txn)
            .await?
            .is_some();
        if has_bookings {
            return Err(AppError::HasBookings);
        }

        // Re-checked in the statement itself so a booking committed in between still wins
        let result = trips::Entity::delete_many()
            .filter(trips::Column::Id.eq(trip.id))
            .filter(
                trips::Column::Id.not_in_subquery(
                    Query::select()
                        .column(bookings::Column::TripId)
                        .from(bookings::Entity)
                        .and_where(bookings::Column::TripId.eq(trip.id))
                        .to_owned(),
                ),
            )
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::HasBookings);
        }

        txn.commit().await?;
        log::info!("Trip {} deleted by its driver", trip.id);
        Ok(trip)
    }
}
