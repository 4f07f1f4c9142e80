mod common;

use chrono::Duration;
use common::setup;
use poputka_backend::AppError;
use poputka_backend::entities::BookingStatus;
use poputka_backend::notifications::NotificationEvent;
use poputka_backend::services::NoShowOutcome;

const DRIVER: i64 = 100;
const ALICE: i64 = 201;
const BOB: i64 = 202;

#[tokio::test]
async fn test_book_cancel_rebook_scenario() {
    let app = setup().await;
    app.user(DRIVER, "Driver").await;
    app.user(ALICE, "Alice").await;
    app.user(BOB, "Bob").await;
    let trip = app.trip(DRIVER, 3, 500).await;

    let a = app.bookings.create_booking(trip.id, ALICE, 2).await.unwrap();
    assert_eq!(a.trip.seats_available, 1);
    assert_eq!(a.booking.status, BookingStatus::Booked);
    assert_eq!(a.passenger.telegram_id, ALICE);

    let err = app.bookings.create_booking(trip.id, BOB, 2).await.unwrap_err();
    assert!(matches!(err, AppError::InsufficientSeats));
    assert_eq!(app.reload_trip(trip.id).await.seats_available, 1);

    let cancelled = app
        .bookings
        .cancel_booking_by_passenger(a.booking.id, ALICE)
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(app.reload_trip(trip.id).await.seats_available, 3);

    let b = app.bookings.create_booking(trip.id, BOB, 2).await.unwrap();
    assert_eq!(b.trip.seats_available, 1);
}

#[tokio::test]
async fn test_booking_records_fare_breakdown() {
    let app = setup().await;
    app.user(DRIVER, "Driver").await;
    app.user(ALICE, "Alice").await;
    let trip = app.trip(DRIVER, 4, 333).await;

    let outcome = app.bookings.create_booking(trip.id, ALICE, 3).await.unwrap();
    assert_eq!(outcome.booking.total_amount, 999);
    // 10% of 999 = 99.9
    assert_eq!(outcome.booking.platform_fee, 100);
    assert_eq!(outcome.booking.driver_amount, 899);
}

#[tokio::test]
async fn test_precondition_order() {
    let app = setup().await;
    app.user(DRIVER, "Driver").await;
    app.user(ALICE, "Alice").await;
    let trip = app.trip(DRIVER, 2, 100).await;

    // seat count is checked before the trip is looked up
    let err = app.bookings.create_booking(9_999, ALICE, 0).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidSeatCount));
    let err = app.bookings.create_booking(trip.id, ALICE, -1).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidSeatCount));

    let err = app.bookings.create_booking(9_999, 777, 1).await.unwrap_err();
    assert!(matches!(err, AppError::TripNotFound));

    let err = app.bookings.create_booking(trip.id, 777, 1).await.unwrap_err();
    assert!(matches!(err, AppError::PassengerNotFound));

    let err = app.bookings.create_booking(trip.id, DRIVER, 1).await.unwrap_err();
    assert!(matches!(err, AppError::CannotBookOwnTrip));

    let err = app.bookings.create_booking(trip.id, ALICE, 3).await.unwrap_err();
    assert!(matches!(err, AppError::InsufficientSeats));

    app.clock.advance(Duration::days(2));
    let err = app.bookings.create_booking(trip.id, ALICE, 1).await.unwrap_err();
    assert!(matches!(err, AppError::TooLate));

    assert_eq!(app.reload_trip(trip.id).await.seats_available, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bookings_never_overbook() {
    let app = setup().await;
    app.user(DRIVER, "Driver").await;
    let trip = app.trip(DRIVER, 5, 100).await;

    let passengers: Vec<i64> = (1..=12).map(|i| 1_000 + i).collect();
    for p in &passengers {
        app.user(*p, "Passenger").await;
    }

    let mut handles = Vec::new();
    for p in passengers {
        let bookings = app.bookings.clone();
        let trip_id = trip.id;
        handles.push(tokio::spawn(async move {
            bookings.create_booking(trip_id, p, 1).await
        }));
    }

    let mut ok = 0;
    let mut insufficient = 0;
    for h in handles {
        match h.await.unwrap() {
            Ok(_) => ok += 1,
            Err(AppError::InsufficientSeats) => insufficient += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(ok, 5);
    assert_eq!(insufficient, 7);
    let trip = app.reload_trip(trip.id).await;
    assert_eq!(trip.seats_available, 0);
    assert!(trip.seats_available <= trip.seats_total);
}

#[tokio::test]
async fn test_duplicate_cancel_restores_seats_once() {
    let app = setup().await;
    app.user(DRIVER, "Driver").await;
    app.user(ALICE, "Alice").await;
    let trip = app.trip(DRIVER, 4, 100).await;
    let outcome = app.bookings.create_booking(trip.id, ALICE, 2).await.unwrap();

    app.bookings
        .cancel_booking_by_passenger(outcome.booking.id, ALICE)
        .await
        .unwrap();
    let err = app
        .bookings
        .cancel_booking_by_passenger(outcome.booking.id, ALICE)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidStatus));
    assert_eq!(app.reload_trip(trip.id).await.seats_available, 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_cancel_restores_once() {
    let app = setup().await;
    app.user(DRIVER, "Driver").await;
    app.user(ALICE, "Alice").await;
    let trip = app.trip(DRIVER, 4, 100).await;
    let outcome = app.bookings.create_booking(trip.id, ALICE, 3).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..4 {
        let bookings = app.bookings.clone();
        let id = outcome.booking.id;
        handles.push(tokio::spawn(async move {
            bookings.cancel_booking_by_passenger(id, ALICE).await
        }));
    }
    let mut ok = 0;
    for h in handles {
        match h.await.unwrap() {
            Ok(_) => ok += 1,
            Err(e) => assert!(matches!(e, AppError::InvalidStatus)),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(app.reload_trip(trip.id).await.seats_available, 4);
}

#[tokio::test]
async fn test_cancel_checks() {
    let app = setup().await;
    app.user(DRIVER, "Driver").await;
    app.user(ALICE, "Alice").await;
    app.user(BOB, "Bob").await;
    let trip = app.trip(DRIVER, 3, 100).await;
    let outcome = app.bookings.create_booking(trip.id, ALICE, 1).await.unwrap();

    let err = app
        .bookings
        .cancel_booking_by_passenger(9_999, ALICE)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BookingNotFound));

    let err = app
        .bookings
        .cancel_booking_by_passenger(outcome.booking.id, BOB)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    // departure time itself is already too late
    app.clock.set(trip.departure_at);
    let err = app
        .bookings
        .cancel_booking_by_passenger(outcome.booking.id, ALICE)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TooLate));

    let trip = app.reload_trip(trip.id).await;
    assert_eq!(trip.seats_available, 2);
    let booking = app.bookings.get_booking(outcome.booking.id).await.unwrap();
    assert_eq!(booking.status, BookingStatus::Booked);
}

#[tokio::test]
async fn test_no_show_is_idempotent() {
    let app = setup().await;
    app.user(DRIVER, "Driver").await;
    app.user(ALICE, "Alice").await;
    app.user(BOB, "Bob").await;
    let trip = app.trip(DRIVER, 3, 100).await;
    let outcome = app.bookings.create_booking(trip.id, ALICE, 2).await.unwrap();

    let err = app
        .bookings
        .mark_booking_no_show(outcome.booking.id, BOB)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    // allowed after departure too
    app.clock.advance(Duration::days(2));
    let first = app
        .bookings
        .mark_booking_no_show(outcome.booking.id, DRIVER)
        .await
        .unwrap();
    let second = app
        .bookings
        .mark_booking_no_show(outcome.booking.id, DRIVER)
        .await
        .unwrap();
    assert_eq!(first, NoShowOutcome::Marked);
    assert_eq!(second, NoShowOutcome::AlreadyMarked);

    assert_eq!(app.reload_user(ALICE).await.no_show_count, 1);
    // no-show keeps the seats consumed
    assert_eq!(app.reload_trip(trip.id).await.seats_available, 1);

    let booking = app.bookings.get_booking(outcome.booking.id).await.unwrap();
    assert_eq!(booking.status, BookingStatus::NoShow);
}

#[tokio::test]
async fn test_no_show_on_cancelled_booking_is_rejected() {
    let app = setup().await;
    app.user(DRIVER, "Driver").await;
    app.user(ALICE, "Alice").await;
    let trip = app.trip(DRIVER, 3, 100).await;
    let outcome = app.bookings.create_booking(trip.id, ALICE, 1).await.unwrap();
    app.bookings
        .cancel_booking_by_passenger(outcome.booking.id, ALICE)
        .await
        .unwrap();

    let err = app
        .bookings
        .mark_booking_no_show(outcome.booking.id, DRIVER)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidStatus));
    assert_eq!(app.reload_user(ALICE).await.no_show_count, 0);
}

#[tokio::test]
async fn test_trip_with_cancelled_booking_cannot_be_deleted() {
    let app = setup().await;
    app.user(DRIVER, "Driver").await;
    app.user(ALICE, "Alice").await;
    let trip = app.trip(DRIVER, 3, 100).await;
    let outcome = app.bookings.create_booking(trip.id, ALICE, 1).await.unwrap();
    app.bookings
        .cancel_booking_by_passenger(outcome.booking.id, ALICE)
        .await
        .unwrap();

    let err = app
        .trips
        .delete_trip_by_driver(trip.id, DRIVER)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::HasBookings));
    assert!(app.trips.get_trip(trip.id).await.is_ok());
}

#[tokio::test]
async fn test_delete_trip_checks() {
    let app = setup().await;
    app.user(DRIVER, "Driver").await;
    app.user(ALICE, "Alice").await;
    let first = app.trip(DRIVER, 3, 100).await;
    let second = app.trip(DRIVER, 3, 100).await;

    let err = app.trips.delete_trip_by_driver(9_999, DRIVER).await.unwrap_err();
    assert!(matches!(err, AppError::TripNotFound));

    let err = app
        .trips
        .delete_trip_by_driver(first.id, ALICE)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let deleted = app.trips.delete_trip_by_driver(first.id, DRIVER).await.unwrap();
    assert_eq!(deleted.id, first.id);
    assert!(matches!(
        app.trips.get_trip(first.id).await,
        Err(AppError::TripNotFound)
    ));

    app.clock.set(second.departure_at + Duration::minutes(1));
    let err = app
        .trips
        .delete_trip_by_driver(second.id, DRIVER)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TooLate));
}

#[tokio::test]
async fn test_notifications_follow_commits() {
    let mut app = setup().await;
    app.user(DRIVER, "Driver").await;
    app.user(ALICE, "Alice").await;
    let trip = app.trip(DRIVER, 3, 100).await;

    let outcome = app.bookings.create_booking(trip.id, ALICE, 2).await.unwrap();
    let _ = app.bookings.create_booking(trip.id, ALICE, 5).await;
    app.bookings
        .cancel_booking_by_passenger(outcome.booking.id, ALICE)
        .await
        .unwrap();

    let events = app.drain_events();
    assert_eq!(events.len(), 2);
    match &events[0] {
        NotificationEvent::BookingCreated {
            driver_chat_id,
            seats,
            seats_left,
            ..
        } => {
            assert_eq!(*driver_chat_id, DRIVER);
            assert_eq!(*seats, 2);
            assert_eq!(*seats_left, 1);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(matches!(
        &events[1],
        NotificationEvent::BookingCancelled { seats_left: 3, .. }
    ));
}
