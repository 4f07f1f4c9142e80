pub mod clock;
pub mod local_day;
pub mod money;
pub mod route;
pub mod vehicle;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use local_day::{LocalDay, day_bounds, local_date, offset_from_minutes, today};
pub use money::{FareBreakdown, fare_breakdown, percent_of};
pub use route::{normalize_place, place_matches, validate_route};
pub use vehicle::{normalize_plate, validate_plate};
