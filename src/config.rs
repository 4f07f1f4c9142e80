use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub booking: BookingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    #[serde(default = "default_telegram_api")]
    pub api_base_url: String,
    /// When false, notifications are only written to the log
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdminConfig {
    /// Telegram id of the single administrator; 0 disables admin operations
    pub telegram_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Platform share of each booking total, in percent
    pub platform_fee_percent: i64,
    pub max_seats_per_trip: i32,
    /// Offset of the service's local time from UTC; defines the calendar day
    pub utc_offset_minutes: i32,
    pub plan_expiry_interval_secs: u64,
}

fn default_telegram_api() -> String {
    "https://api.telegram.org".to_string()
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_base_url: default_telegram_api(),
            enabled: false,
        }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            platform_fee_percent: 10,
            max_seats_per_trip: 8,
            utc_offset_minutes: 0,
            plan_expiry_interval_secs: 300,
        }
    }
}

impl BookingConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0..=100).contains(&self.platform_fee_percent) {
            return Err(format!(
                "platform_fee_percent must be within 0..=100, got {}",
                self.platform_fee_percent
            ));
        }
        if self.max_seats_per_trip < 1 {
            return Err("max_seats_per_trip must be at least 1".to_string());
        }
        // chrono::FixedOffset accepts strictly less than a day
        if self.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(format!(
                "utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            ));
        }
        Ok(())
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // Without a config file everything comes from the environment
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("Failed to parse config file: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Config::from_env_defaults(),
            Err(e) => {
                return Err(format!("Cannot read config file {config_path}: {e}").into());
            }
        };

        // Environment always wins over the file
        config.apply_env_overrides();
        config.booking.validate()?;

        Ok(config)
    }

    fn from_env_defaults() -> Self {
        Config {
            server: ServerConfig {
                host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: get_env_parse("SERVER_PORT", 8080u16),
            },
            database: DatabaseConfig {
                url: get_env("DATABASE_URL")
                    .unwrap_or_else(|| "sqlite://poputka.db?mode=rwc".to_string()),
                max_connections: get_env_parse("DB_MAX_CONNECTIONS", 5u32),
            },
            telegram: TelegramConfig {
                bot_token: get_env("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
                api_base_url: get_env("TELEGRAM_API_BASE_URL")
                    .unwrap_or_else(default_telegram_api),
                enabled: get_env_parse("TELEGRAM_NOTIFICATIONS_ENABLED", false),
            },
            admin: AdminConfig {
                telegram_id: get_env_parse("ADMIN_TELEGRAM_ID", 0i64),
            },
            booking: BookingConfig::default(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("TELEGRAM_BOT_TOKEN") {
            self.telegram.bot_token = v;
        }
        if let Ok(v) = env::var("TELEGRAM_API_BASE_URL") {
            self.telegram.api_base_url = v;
        }
        if let Ok(v) = env::var("TELEGRAM_NOTIFICATIONS_ENABLED")
            && let Ok(b) = v.parse()
        {
            self.telegram.enabled = b;
        }
        if let Ok(v) = env::var("ADMIN_TELEGRAM_ID")
            && let Ok(id) = v.parse()
        {
            self.admin.telegram_id = id;
        }
        if let Ok(v) = env::var("PLATFORM_FEE_PERCENT")
            && let Ok(n) = v.parse()
        {
            self.booking.platform_fee_percent = n;
        }
        if let Ok(v) = env::var("MAX_SEATS_PER_TRIP")
            && let Ok(n) = v.parse()
        {
            self.booking.max_seats_per_trip = n;
        }
        if let Ok(v) = env::var("LOCAL_UTC_OFFSET_MINUTES")
            && let Ok(n) = v.parse()
        {
            self.booking.utc_offset_minutes = n;
        }
        if let Ok(v) = env::var("PLAN_EXPIRY_INTERVAL_SECS")
            && let Ok(n) = v.parse()
        {
            self.booking.plan_expiry_interval_secs = n;
        }
    }
}

fn get_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_toml() {
        let raw = r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [database]
            url = "sqlite::memory:"
            max_connections = 1
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.booking.platform_fee_percent, 10);
        assert_eq!(config.telegram.api_base_url, "https://api.telegram.org");
        assert!(!config.telegram.enabled);
        assert_eq!(config.admin.telegram_id, 0);
    }

    #[test]
    fn test_parse_booking_section() {
        let raw = r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [database]
            url = "sqlite://poputka.db?mode=rwc"
            max_connections = 5

            [admin]
            telegram_id = 42

            [booking]
            platform_fee_percent = 15
            max_seats_per_trip = 6
            utc_offset_minutes = 360
            plan_expiry_interval_secs = 60
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.admin.telegram_id, 42);
        assert_eq!(config.booking.platform_fee_percent, 15);
        assert_eq!(config.booking.utc_offset_minutes, 360);
        assert!(config.booking.validate().is_ok());
    }

    #[test]
    fn test_booking_config_validation() {
        let mut booking = BookingConfig::default();
        assert!(booking.validate().is_ok());

        booking.platform_fee_percent = 101;
        assert!(booking.validate().is_err());

        booking.platform_fee_percent = 10;
        booking.utc_offset_minutes = 24 * 60;
        assert!(booking.validate().is_err());

        booking.utc_offset_minutes = -300;
        booking.max_seats_per_trip = 0;
        assert!(booking.validate().is_err());
    }
}
