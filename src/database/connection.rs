use crate::config::DatabaseConfig;
use crate::error::AppResult;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;

pub type DbPool = DatabaseConnection;

pub async fn create_pool(config: &DatabaseConfig) -> AppResult<DbPool> {
    let mut options = ConnectOptions::new(config.url.clone());
    // SQLite has a single writer: with more than one connection, two deferred
    // transactions that both write fail with SQLITE_BUSY instead of queueing.
    // An in-memory database also lives and dies with its one connection.
    let max_connections = if config.url.starts_with("sqlite:") {
        1
    } else {
        config.max_connections.max(1)
    };
    options
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let pool = Database::connect(options).await?;
    log::info!("Database connected (max_connections={max_connections})");

    Ok(pool)
}

pub async fn run_migrations(pool: &DbPool) -> AppResult<()> {
    Migrator::up(pool, None).await?;
    log::info!("Database migrations applied");
    Ok(())
}
