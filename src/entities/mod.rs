pub mod app_settings;
pub mod bookings;
pub mod passenger_plans;
pub mod payment_proofs;
pub mod trips;
pub mod users;

pub use app_settings as app_settings_entity;
pub use bookings as booking_entity;
pub use passenger_plans as plan_entity;
pub use payment_proofs as payment_proof_entity;
pub use trips as trip_entity;
pub use users as user_entity;

pub use bookings::BookingStatus;
pub use passenger_plans::PlanStatus;
