use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;
use std::time::Duration;

use poputka_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::TelegramNotifier,
    handlers,
    middlewares::{IdentityMiddleware, create_cors},
    notifications::{LogNotifier, NotificationSender, Notifier, spawn_dispatcher},
    services::*,
    swagger::swagger_config,
    tasks,
    utils::{SharedClock, SystemClock, offset_from_minutes},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration");

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let clock: SharedClock = Arc::new(SystemClock);
    let offset = offset_from_minutes(config.booking.utc_offset_minutes);

    // Notifications are delivered after commit, on their own task
    let notifier: Arc<dyn Notifier> = if config.telegram.enabled {
        Arc::new(
            TelegramNotifier::new(config.telegram.clone())
                .expect("Failed to initialise Telegram notifier"),
        )
    } else {
        log::warn!("Telegram notifications disabled; messages go to the log only");
        Arc::new(LogNotifier)
    };
    let (notifications, rx) = NotificationSender::channel();
    spawn_dispatcher(rx, notifier, offset);

    let user_service = UserService::new(pool.clone(), clock.clone());
    let settings_service = SettingsService::new(pool.clone(), clock.clone());
    let monetization_service = MonetizationService::new(
        pool.clone(),
        clock.clone(),
        notifications.clone(),
        offset,
        config.admin.telegram_id,
    );
    let trip_service = TripService::new(pool.clone(), clock.clone(), config.booking.clone());
    let booking_service = BookingService::new(
        pool.clone(),
        clock.clone(),
        notifications.clone(),
        config.booking.clone(),
    );
    let plan_service = PlanService::new(
        pool.clone(),
        clock.clone(),
        notifications.clone(),
        config.booking.clone(),
    );
    let admin_service = AdminService::new(
        pool.clone(),
        clock.clone(),
        notifications.clone(),
        settings_service.clone(),
        monetization_service.clone(),
        config.admin.telegram_id,
    );
    if config.admin.telegram_id == 0 {
        log::warn!("ADMIN_TELEGRAM_ID is not set; admin operations are unavailable");
    }

    tasks::spawn_all(
        plan_service.clone(),
        Duration::from_secs(config.booking.plan_expiry_interval_secs.max(1)),
    );

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware)
            .wrap(create_cors())
            .wrap(Logger::default())
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(settings_service.clone()))
            .app_data(web::Data::new(monetization_service.clone()))
            .app_data(web::Data::new(trip_service.clone()))
            .app_data(web::Data::new(booking_service.clone()))
            .app_data(web::Data::new(plan_service.clone()))
            .app_data(web::Data::new(admin_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::health_config)
                    .configure(handlers::user_config)
                    .configure(handlers::trip_config)
                    .configure(handlers::booking_config)
                    .configure(handlers::plan_config)
                    .configure(handlers::monetization_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
