use super::events::{NotificationEvent, TripSnapshot};
use chrono::{DateTime, FixedOffset, Utc};

fn local_time(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%d.%m %H:%M").to_string()
}

fn route(trip: &TripSnapshot, offset: FixedOffset) -> String {
    format!(
        "{} → {}, {}",
        trip.origin,
        trip.destination,
        local_time(trip.departure_at, offset)
    )
}

fn mention(name: &str, username: &Option<String>) -> String {
    match username {
        Some(u) if !u.is_empty() => format!("{name} (@{u})"),
        _ => name.to_string(),
    }
}

/// Plain-text message body for an event, times rendered in local time
pub fn render(event: &NotificationEvent, offset: FixedOffset) -> String {
    match event {
        NotificationEvent::BookingCreated {
            passenger_name,
            passenger_username,
            trip,
            seats,
            seats_left,
            total_amount,
            ..
        } => format!(
            "New booking: {} booked {} seat(s) on your trip {}.\nTotal: {}. Seats left: {}.",
            mention(passenger_name, passenger_username),
            seats,
            route(trip, offset),
            total_amount,
            seats_left
        ),
        NotificationEvent::BookingCancelled {
            passenger_name,
            trip,
            seats,
            seats_left,
            ..
        } => format!(
            "{} cancelled {} seat(s) on your trip {}.\nSeats left: {}.",
            passenger_name,
            seats,
            route(trip, offset),
            seats_left
        ),
        NotificationEvent::PassengerNoShow { trip, .. } => format!(
            "The driver marked you as a no-show for the trip {}.",
            route(trip, offset)
        ),
        NotificationEvent::PlanTaken {
            driver_name,
            driver_username,
            origin,
            destination,
            desired_at,
            ..
        } => format!(
            "Your ride request {} → {}, {} was taken by {}.",
            origin,
            destination,
            local_time(*desired_at, offset),
            mention(driver_name, driver_username)
        ),
        NotificationEvent::PaymentProofSubmitted {
            driver_name,
            driver_telegram_id,
            proof_date,
            file_ref,
            ..
        } => format!(
            "Payment proof from {} (id {}) for {}: {}",
            driver_name,
            driver_telegram_id,
            proof_date.format("%Y-%m-%d"),
            file_ref
        ),
        NotificationEvent::DriverBlockChanged { blocked, .. } => {
            if *blocked {
                "Your account was blocked by the administrator. You cannot post new trips."
                    .to_string()
            } else {
                "Your account was unblocked. You can post trips again.".to_string()
            }
        }
    }
}
