#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use poputka_backend::config::{BookingConfig, DatabaseConfig};
use poputka_backend::database::{DbPool, create_pool, run_migrations};
use poputka_backend::entities::{trip_entity as trips, user_entity as users};
use poputka_backend::notifications::{NotificationEvent, NotificationSender};
use poputka_backend::services::*;
use poputka_backend::utils::{Clock, ManualClock, SharedClock, offset_from_minutes};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

pub const ADMIN: i64 = 9_000;

pub struct TestApp {
    pub pool: DbPool,
    pub clock: Arc<ManualClock>,
    pub events: UnboundedReceiver<NotificationEvent>,
    pub users: UserService,
    pub settings: SettingsService,
    pub monetization: MonetizationService,
    pub trips: TripService,
    pub bookings: BookingService,
    pub plans: PlanService,
    pub admin: AdminService,
}

/// 2025-05-01 06:00 UTC
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 6, 0, 0).unwrap()
}

pub async fn setup() -> TestApp {
    let pool = create_pool(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    })
    .await
    .expect("in-memory database");
    run_migrations(&pool).await.expect("migrations");

    let clock = Arc::new(ManualClock::new(start_time()));
    let shared: SharedClock = clock.clone();
    let config = BookingConfig::default();
    let offset = offset_from_minutes(config.utc_offset_minutes);
    let (notifications, events) = NotificationSender::channel();

    let settings = SettingsService::new(pool.clone(), shared.clone());
    let monetization = MonetizationService::new(
        pool.clone(),
        shared.clone(),
        notifications.clone(),
        offset,
        ADMIN,
    );

    TestApp {
        users: UserService::new(pool.clone(), shared.clone()),
        trips: TripService::new(pool.clone(), shared.clone(), config.clone()),
        bookings: BookingService::new(
            pool.clone(),
            shared.clone(),
            notifications.clone(),
            config.clone(),
        ),
        plans: PlanService::new(pool.clone(), shared.clone(), notifications.clone(), config),
        admin: AdminService::new(
            pool.clone(),
            shared.clone(),
            notifications,
            settings.clone(),
            monetization.clone(),
            ADMIN,
        ),
        settings,
        monetization,
        pool,
        clock,
        events,
    }
}

impl TestApp {
    pub async fn user(&self, telegram_id: i64, first_name: &str) -> users::Model {
        self.users
            .upsert_user(TelegramProfile {
                telegram_id,
                first_name: first_name.to_string(),
                last_name: None,
                username: None,
            })
            .await
            .expect("upsert user")
    }

    /// Trip departing one day from now
    pub async fn trip(&self, driver_telegram_id: i64, seats: i32, price: i64) -> trips::Model {
        self.trips
            .create_trip(
                driver_telegram_id,
                NewTrip {
                    origin: "Bishkek".to_string(),
                    destination: "Osh".to_string(),
                    departure_at: self.clock.now() + Duration::days(1),
                    seats_total: seats,
                    price_per_seat: price,
                    note: None,
                },
            )
            .await
            .expect("create trip")
    }

    pub async fn reload_trip(&self, trip_id: i64) -> trips::Model {
        self.trips.get_trip(trip_id).await.expect("trip exists")
    }

    pub async fn reload_user(&self, telegram_id: i64) -> users::Model {
        self.users.get_user(telegram_id).await.expect("user exists")
    }

    pub fn drain_events(&mut self) -> Vec<NotificationEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            out.push(event);
        }
        out
    }
}
