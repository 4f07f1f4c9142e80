pub mod admin_service;
pub mod booking_service;
pub mod monetization_service;
pub mod plan_service;
pub mod settings_service;
pub mod trip_service;
pub mod user_service;

pub use admin_service::*;
pub use booking_service::*;
pub use monetization_service::*;
pub use plan_service::*;
pub use settings_service::*;
pub use trip_service::*;
pub use user_service::*;
