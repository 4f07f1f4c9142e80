use crate::entities::{booking_entity as bookings, trip_entity as trips, user_entity as users};
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::mpsc;

/// What the recipient needs to know about a trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripSnapshot {
    pub trip_id: i64,
    pub origin: String,
    pub destination: String,
    pub departure_at: DateTime<Utc>,
}

impl From<&trips::Model> for TripSnapshot {
    fn from(trip: &trips::Model) -> Self {
        Self {
            trip_id: trip.id,
            origin: trip.origin.clone(),
            destination: trip.destination.clone(),
            departure_at: trip.departure_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    /// To the driver
    BookingCreated {
        driver_chat_id: i64,
        passenger_name: String,
        passenger_username: Option<String>,
        trip: TripSnapshot,
        seats: i32,
        seats_left: i32,
        total_amount: i64,
    },
    /// To the driver
    BookingCancelled {
        driver_chat_id: i64,
        passenger_name: String,
        trip: TripSnapshot,
        seats: i32,
        seats_left: i32,
    },
    /// To the passenger
    PassengerNoShow {
        passenger_chat_id: i64,
        trip: TripSnapshot,
    },
    /// To the passenger who posted the plan
    PlanTaken {
        passenger_chat_id: i64,
        driver_name: String,
        driver_username: Option<String>,
        origin: String,
        destination: String,
        desired_at: DateTime<Utc>,
    },
    /// To the administrator
    PaymentProofSubmitted {
        admin_chat_id: i64,
        driver_name: String,
        driver_telegram_id: i64,
        proof_date: NaiveDate,
        file_ref: String,
    },
    /// To the driver
    DriverBlockChanged { driver_chat_id: i64, blocked: bool },
}

impl NotificationEvent {
    pub fn booking_created(
        booking: &bookings::Model,
        trip: &trips::Model,
        driver: &users::Model,
        passenger: &users::Model,
    ) -> Self {
        NotificationEvent::BookingCreated {
            driver_chat_id: driver.telegram_id,
            passenger_name: passenger.display_name(),
            passenger_username: passenger.username.clone(),
            trip: TripSnapshot::from(trip),
            seats: booking.seats_booked,
            seats_left: trip.seats_available,
            total_amount: booking.total_amount,
        }
    }

    pub fn chat_id(&self) -> i64 {
        match self {
            NotificationEvent::BookingCreated { driver_chat_id, .. }
            | NotificationEvent::BookingCancelled { driver_chat_id, .. }
            | NotificationEvent::DriverBlockChanged { driver_chat_id, .. } => *driver_chat_id,
            NotificationEvent::PassengerNoShow {
                passenger_chat_id, ..
            }
            | NotificationEvent::PlanTaken {
                passenger_chat_id, ..
            } => *passenger_chat_id,
            NotificationEvent::PaymentProofSubmitted { admin_chat_id, .. } => *admin_chat_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NotificationEvent::BookingCreated { .. } => "booking_created",
            NotificationEvent::BookingCancelled { .. } => "booking_cancelled",
            NotificationEvent::PassengerNoShow { .. } => "passenger_no_show",
            NotificationEvent::PlanTaken { .. } => "plan_taken",
            NotificationEvent::PaymentProofSubmitted { .. } => "payment_proof_submitted",
            NotificationEvent::DriverBlockChanged { .. } => "driver_block_changed",
        }
    }
}

#[derive(Clone, Debug)]
pub struct NotificationSender {
    tx: mpsc::UnboundedSender<NotificationEvent>,
}

impl NotificationSender {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<NotificationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Never fails the caller; a closed channel only loses the message
    pub fn emit(&self, event: NotificationEvent) {
        let name = event.name();
        if let Err(e) = self.tx.send(event) {
            log::warn!("Dropping {name} notification, dispatcher is gone: {e}");
        }
    }
}
