mod common;

use chrono::Duration;
use common::{ADMIN, setup};
use poputka_backend::AppError;
use poputka_backend::notifications::NotificationEvent;
use poputka_backend::services::{GateReason, NewTrip, SettingsUpdate};
use poputka_backend::utils::Clock;

const DRIVER: i64 = 500;
const PASSENGER: i64 = 600;

fn new_trip(app: &common::TestApp) -> NewTrip {
    NewTrip {
        origin: "Bishkek".to_string(),
        destination: "Karakol".to_string(),
        departure_at: app.clock.now() + Duration::hours(6),
        seats_total: 3,
        price_per_seat: 250,
        note: None,
    }
}

async fn enable_monetization(app: &common::TestApp) {
    app.admin
        .update_settings(
            ADMIN,
            SettingsUpdate {
                monetization_enabled: Some(true),
                payment_instructions: Some("Pay to card 1234".to_string()),
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unpaid_fee_blocks_next_trip_until_proof() {
    let mut app = setup().await;
    app.user(DRIVER, "Driver").await;
    app.user(PASSENGER, "Passenger").await;
    enable_monetization(&app).await;

    let first = app.trip(DRIVER, 3, 250).await;
    // 2 seats x 250 = 500, 10% fee
    app.bookings
        .create_booking(first.id, PASSENGER, 2)
        .await
        .unwrap();

    let (decision, activity) = app.monetization.check_gate(DRIVER).await.unwrap();
    assert!(!decision.allowed);
    assert_eq!(decision.reason, GateReason::UnpaidFee { fee_due: 50 });
    assert_eq!(activity.trips_today, 1);

    let err = app
        .trips
        .create_trip(DRIVER, new_trip(&app))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PaymentRequired { fee_due: 50 }));

    app.drain_events();
    app.monetization
        .record_payment_proof(DRIVER, "tg-file-123", Some("paid".to_string()))
        .await
        .unwrap();
    let events = app.drain_events();
    assert!(matches!(
        &events[..],
        [NotificationEvent::PaymentProofSubmitted { admin_chat_id, .. }] if *admin_chat_id == ADMIN
    ));

    let (decision, _) = app.monetization.check_gate(DRIVER).await.unwrap();
    assert_eq!(decision.reason, GateReason::ProofSubmitted);
    app.trips.create_trip(DRIVER, new_trip(&app)).await.unwrap();
}

#[tokio::test]
async fn test_cancelled_bookings_do_not_accrue_fee() {
    let app = setup().await;
    app.user(DRIVER, "Driver").await;
    app.user(PASSENGER, "Passenger").await;
    enable_monetization(&app).await;

    let trip = app.trip(DRIVER, 3, 250).await;
    let outcome = app
        .bookings
        .create_booking(trip.id, PASSENGER, 1)
        .await
        .unwrap();
    app.bookings
        .cancel_booking_by_passenger(outcome.booking.id, PASSENGER)
        .await
        .unwrap();

    let (decision, activity) = app.monetization.check_gate(DRIVER).await.unwrap();
    assert!(decision.allowed);
    assert_eq!(decision.reason, GateReason::NoFeeAccrued);
    assert_eq!(activity.fee_today, 0);
}

#[tokio::test]
async fn test_fee_does_not_carry_over_to_next_day() {
    let app = setup().await;
    app.user(DRIVER, "Driver").await;
    app.user(PASSENGER, "Passenger").await;
    enable_monetization(&app).await;

    let trip = app.trip(DRIVER, 3, 250).await;
    app.bookings
        .create_booking(trip.id, PASSENGER, 2)
        .await
        .unwrap();
    assert!(!app.monetization.check_gate(DRIVER).await.unwrap().0.allowed);

    app.clock.advance(Duration::days(1));
    let (decision, activity) = app.monetization.check_gate(DRIVER).await.unwrap();
    assert!(decision.allowed);
    assert_eq!(decision.reason, GateReason::NoTripsToday);
    assert_eq!(activity.fee_today, 0);
}

#[tokio::test]
async fn test_disabled_monetization_never_blocks() {
    let app = setup().await;
    app.user(DRIVER, "Driver").await;
    app.user(PASSENGER, "Passenger").await;

    let trip = app.trip(DRIVER, 3, 250).await;
    app.bookings
        .create_booking(trip.id, PASSENGER, 3)
        .await
        .unwrap();

    let (decision, _) = app.monetization.check_gate(DRIVER).await.unwrap();
    assert_eq!(decision.reason, GateReason::MonetizationDisabled);
    app.trips.create_trip(DRIVER, new_trip(&app)).await.unwrap();
}

#[tokio::test]
async fn test_daily_report_lists_fee_and_proof() {
    let app = setup().await;
    app.user(DRIVER, "Driver").await;
    app.user(PASSENGER, "Passenger").await;

    let trip = app.trip(DRIVER, 3, 250).await;
    app.bookings
        .create_booking(trip.id, PASSENGER, 2)
        .await
        .unwrap();
    app.monetization
        .record_payment_proof(DRIVER, "receipt.jpg", None)
        .await
        .unwrap();

    let report = app.admin.daily_fee_report(ADMIN, None).await.unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].telegram_id, DRIVER);
    assert_eq!(report[0].trips_created, 1);
    assert_eq!(report[0].fee_accrued, 50);
    assert!(report[0].proof_submitted);

    let proofs = app.admin.list_payment_proofs(ADMIN, None).await.unwrap();
    assert_eq!(proofs.len(), 1);
    assert_eq!(proofs[0].0.file_ref, "receipt.jpg");
    let driver = proofs[0].1.as_ref().expect("proof carries its driver");
    assert_eq!(driver.telegram_id, DRIVER);

    let err = app
        .monetization
        .record_payment_proof(DRIVER, "  ", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}
