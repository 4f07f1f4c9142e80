mod common;

use chrono::{Duration, NaiveDate};
use common::setup;
use poputka_backend::AppError;
use poputka_backend::services::{NewTrip, TripSearch};
use poputka_backend::utils::Clock;

const DRIVER: i64 = 800;
const PASSENGER: i64 = 900;

fn trip_to(app: &common::TestApp, destination: &str, hours: i64, seats: i32) -> NewTrip {
    NewTrip {
        origin: "Bishkek".to_string(),
        destination: destination.to_string(),
        departure_at: app.clock.now() + Duration::hours(hours),
        seats_total: seats,
        price_per_seat: 700,
        note: None,
    }
}

#[tokio::test]
async fn test_trip_validation() {
    let app = setup().await;
    app.user(DRIVER, "Driver").await;

    let cases = [
        trip_to(&app, "Osh", 2, 0),
        trip_to(&app, "Osh", 2, 9),
        trip_to(&app, "bishkek", 2, 2),
        trip_to(&app, "", 2, 2),
        trip_to(&app, "Osh", -1, 2),
    ];
    for case in cases {
        let err = app.trips.create_trip(DRIVER, case).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)), "{err}");
    }

    let mut negative = trip_to(&app, "Osh", 2, 2);
    negative.price_per_seat = -5;
    assert!(matches!(
        app.trips.create_trip(DRIVER, negative).await,
        Err(AppError::ValidationError(_))
    ));

    let err = app
        .trips
        .create_trip(4_242, trip_to(&app, "Osh", 2, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UserNotFound));
}

#[tokio::test]
async fn test_search_skips_full_and_past_trips() {
    let app = setup().await;
    app.user(DRIVER, "Driver").await;
    app.user(PASSENGER, "Passenger").await;

    let osh = app
        .trips
        .create_trip(DRIVER, trip_to(&app, "Osh", 3, 2))
        .await
        .unwrap();
    let karakol = app
        .trips
        .create_trip(DRIVER, trip_to(&app, "Karakol", 30, 1))
        .await
        .unwrap();
    let soon = app
        .trips
        .create_trip(DRIVER, trip_to(&app, "Naryn", 1, 2))
        .await
        .unwrap();

    app.bookings
        .create_booking(karakol.id, PASSENGER, 1)
        .await
        .unwrap();

    let all = app.trips.search_trips(TripSearch::default()).await.unwrap();
    let ids: Vec<i64> = all.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![soon.id, osh.id]);

    let filtered = app
        .trips
        .search_trips(TripSearch {
            destination: Some("OSH".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, osh.id);

    let other_day = app
        .trips
        .search_trips(TripSearch {
            date: NaiveDate::from_ymd_opt(2025, 5, 3),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(other_day.is_empty());

    app.clock.advance(Duration::hours(2));
    let later = app.trips.search_trips(TripSearch::default()).await.unwrap();
    assert_eq!(later.len(), 1);
    assert_eq!(later[0].id, osh.id);

    let mine = app.trips.list_driver_trips(DRIVER).await.unwrap();
    assert_eq!(mine.len(), 3);
    assert_eq!(mine[0].id, karakol.id);
}

#[tokio::test]
async fn test_passenger_list_is_driver_only() {
    let app = setup().await;
    app.user(DRIVER, "Driver").await;
    app.user(PASSENGER, "Passenger").await;
    let trip = app.trip(DRIVER, 3, 100).await;
    app.bookings.create_booking(trip.id, PASSENGER, 2).await.unwrap();

    let err = app
        .trips
        .list_trip_passengers(trip.id, PASSENGER)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let rows = app.trips.list_trip_passengers(trip.id, DRIVER).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].1.telegram_id, PASSENGER);
    assert_eq!(rows[0].0.seats_booked, 2);

    let history = app.users.list_passenger_bookings(PASSENGER).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].1.id, trip.id);
}
