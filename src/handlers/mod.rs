pub mod admin;
pub mod booking;
pub mod health;
pub mod monetization;
pub mod plan;
pub mod trip;
pub mod user;

pub use admin::admin_config;
pub use booking::booking_config;
pub use health::health_config;
pub use monetization::monetization_config;
pub use plan::plan_config;
pub use trip::trip_config;
pub use user::user_config;
