//! Seat accounting.
//!
//! Every mutation runs in one transaction, and every check that guards a
//! write is repeated by the write itself as a conditional UPDATE whose
//! affected-row count decides the outcome. Notifications go out only after
//! commit.

use crate::config::BookingConfig;
use crate::entities::{
    BookingStatus, booking_entity as bookings, trip_entity as trips, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::notifications::{NotificationEvent, NotificationSender, TripSnapshot};
use crate::services::user_service::find_by_telegram;
use crate::utils::{SharedClock, fare_breakdown};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};

/// Result of a successful booking
#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub booking: bookings::Model,
    /// Trip as it stands after the seat decrement
    pub trip: trips::Model,
    pub passenger: users::Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoShowOutcome {
    Marked,
    AlreadyMarked,
}

async fn load_trip<C: ConnectionTrait>(db: &C, trip_id: i64) -> AppResult<trips::Model> {
    trips::Entity::find_by_id(trip_id)
        .one(db)
        .await?
        .ok_or(AppError::TripNotFound)
}

async fn load_booking<C: ConnectionTrait>(db: &C, booking_id: i64) -> AppResult<bookings::Model> {
    bookings::Entity::find_by_id(booking_id)
        .one(db)
        .await?
        .ok_or(AppError::BookingNotFound)
}

#[derive(Clone)]
pub struct BookingService {
    pool: DatabaseConnection,
    clock: SharedClock,
    notifications: NotificationSender,
    config: BookingConfig,
}

impl BookingService {
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

    pub async fn get_booking(&self, booking_id: i64) -> AppResult<bookings::Model> {
        load_booking(&self.pool, booking_id).await
    }

    /// Reserve `seats` on a trip for the passenger.
    ///
    /// Checks, in order: seat count, trip, passenger, own trip, departure, availability.
    pub async fn create_booking(
        &self,
        trip_id: i64,
        passenger_telegram_id: i64,
        seats: i32,
    ) -> AppResult<BookingOutcome> {
        if seats <= 0 {
            return Err(AppError::InvalidSeatCount);
        }
        let now = self.clock.now();
        let txn = self.pool.begin().await?;

        let trip = load_trip(&txn, trip_id).await?;
        let passenger = find_by_telegram(&txn, passenger_telegram_id)
            .await?
            .ok_or(AppError::PassengerNotFound)?;
        if passenger.id == trip.driver_id {
            return Err(AppError::CannotBookOwnTrip);
        }
        if trip.has_departed(now) {
            return Err(AppError::TooLate);
        }
        if trip.seats_available < seats {
            return Err(AppError::InsufficientSeats);
        }

        let decremented = trips::Entity::update_many()
            .col_expr(
                trips::Column::SeatsAvailable,
                Expr::col(trips::Column::SeatsAvailable).sub(seats),
            )
            .filter(trips::Column::Id.eq(trip.id))
            .filter(trips::Column::SeatsAvailable.gte(seats))
            .exec(&txn)
            .await?;
        if decremented.rows_affected == 0 {
            return Err(AppError::InsufficientSeats);
        }

        let fare = fare_breakdown(trip.price_per_seat, seats, self.config.platform_fee_percent);
        let booking = bookings::ActiveModel {
            trip_id: Set(trip.id),
            passenger_id: Set(passenger.id),
            seats_booked: Set(seats),
            total_amount: Set(fare.total_amount),
            driver_amount: Set(fare.driver_amount),
            platform_fee: Set(fare.platform_fee),
            status: Set(BookingStatus::Booked),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let trip = load_trip(&txn, trip.id).await?;
        let driver = users::Entity::find_by_id(trip.driver_id).one(&txn).await?;

        txn.commit().await?;

        log::info!(
            "Booking {} created: trip {} passenger {} seats {} ({} left)",
            booking.id,
            trip.id,
            passenger.id,
            seats,
            trip.seats_available
        );

        if let Some(driver) = driver {
            self.notifications.emit(NotificationEvent::booking_created(
                &booking, &trip, &driver, &passenger,
            ));
        }

        Ok(BookingOutcome {
            booking,
            trip,
            passenger,
        })
    }

    /// Passenger gives seats back, strictly before departure
    pub async fn cancel_booking_by_passenger(
        &self,
        booking_id: i64,
        passenger_telegram_id: i64,
    ) -> AppResult<bookings::Model> {
        let now = self.clock.now();
        let txn = self.pool.begin().await?;

        let booking = load_booking(&txn, booking_id).await?;
        let caller = find_by_telegram(&txn, passenger_telegram_id).await?;
        let Some(passenger) = caller.filter(|u| u.id == booking.passenger_id) else {
            return Err(AppError::Forbidden);
        };
        if booking.status.is_terminal() {
            return Err(AppError::InvalidStatus);
        }
        let trip = load_trip(&txn, booking.trip_id).await?;
        if trip.has_departed(now) {
            return Err(AppError::TooLate);
        }

        let flipped = bookings::Entity::update_many()
            .col_expr(
                bookings::Column::Status,
                Expr::value(BookingStatus::Cancelled),
            )
            .col_expr(bookings::Column::UpdatedAt, Expr::value(now))
            .filter(bookings::Column::Id.eq(booking.id))
            .filter(bookings::Column::Status.eq(BookingStatus::Booked))
            .exec(&txn)
            .await?;
        if flipped.rows_affected == 0 {
            return Err(AppError::InvalidStatus);
        }

        let restored = trips::Entity::update_many()
            .col_expr(
                trips::Column::SeatsAvailable,
                Expr::col(trips::Column::SeatsAvailable).add(booking.seats_booked),
            )
            .filter(trips::Column::Id.eq(trip.id))
            .filter(
                Expr::col(trips::Column::SeatsAvailable)
                    .lte(Expr::col(trips::Column::SeatsTotal).sub(booking.seats_booked)),
            )
            .exec(&txn)
            .await?;
        if restored.rows_affected == 0 {
            // Seat counter disagrees with the booking ledger; refuse rather than overflow
            return Err(AppError::InternalError(format!(
                "Seat restore for booking {} would exceed the total of trip {}",
                booking.id, trip.id
            )));
        }

        let booking = load_booking(&txn, booking.id).await?;
        let trip = load_trip(&txn, trip.id).await?;
        let driver = users::Entity::find_by_id(trip.driver_id).one(&txn).await?;

        txn.commit().await?;

        log::info!(
            "Booking {} cancelled by passenger {}: {} seat(s) back on trip {}",
            booking.id,
            passenger.id,
            booking.seats_booked,
            trip.id
        );

        if let Some(driver) = driver {
            self.notifications.emit(NotificationEvent::BookingCancelled {
                driver_chat_id: driver.telegram_id,
                passenger_name: passenger.display_name(),
                trip: TripSnapshot::from(&trip),
                seats: booking.seats_booked,
                seats_left: trip.seats_available,
            });
        }

        Ok(booking)
    }

    /// Driver reports that a booked passenger did not show up.
    ///
    /// Idempotent: a booking already marked is a successful no-op. Seats are not restored.
    pub async fn mark_booking_no_show(
        &self,
        booking_id: i64,
        driver_telegram_id: i64,
    ) -> AppResult<NoShowOutcome> {
        let now = self.clock.now();
        let txn = self.pool.begin().await?;

        let booking = load_booking(&txn, booking_id).await?;
        let trip = load_trip(&txn, booking.trip_id).await?;
        let caller = find_by_telegram(&txn, driver_telegram_id).await?;
        if caller.map(|u| u.id) != Some(trip.driver_id) {
            return Err(AppError::Forbidden);
        }

        match booking.status {
            BookingStatus::NoShow => return Ok(NoShowOutcome::AlreadyMarked),
            BookingStatus::Cancelled => return Err(AppError::InvalidStatus),
            BookingStatus::Booked => {}
        }

        let flipped = bookings::Entity::update_many()
            .col_expr(bookings::Column::Status, Expr::value(BookingStatus::NoShow))
            .col_expr(bookings::Column::UpdatedAt, Expr::value(now))
            .filter(bookings::Column::Id.eq(booking.id))
            .filter(bookings::Column::Status.eq(BookingStatus::Booked))
            .exec(&txn)
            .await?;

        if flipped.rows_affected == 0 {
            // Lost a race; only a concurrent no-show mark is acceptable
            let current = load_booking(&txn, booking.id).await?;
            return match current.status {
                BookingStatus::NoShow => Ok(NoShowOutcome::AlreadyMarked),
                _ => Err(AppError::InvalidStatus),
            };
        }

        users::Entity::update_many()
            .col_expr(
                users::Column::NoShowCount,
                Expr::col(users::Column::NoShowCount).add(1),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(now))
            .filter(users::Column::Id.eq(booking.passenger_id))
            .exec(&txn)
            .await?;

        let passenger = users::Entity::find_by_id(booking.passenger_id)
            .one(&txn)
            .await?;

        txn.commit().await?;

        log::info!(
            "Booking {} marked no-show by the driver of trip {}",
            booking.id,
            trip.id
        );

        if let Some(passenger) = passenger {
            self.notifications.emit(NotificationEvent::PassengerNoShow {
                passenger_chat_id: passenger.telegram_id,
                trip: TripSnapshot::from(&trip),
            });
        }

        Ok(NoShowOutcome::Marked)
    }
}
