pub mod admin;
pub mod booking;
pub mod common;
pub mod plan;
pub mod trip;
pub mod user;

pub use admin::*;
pub use booking::*;
pub use common::*;
pub use plan::*;
pub use trip::*;
pub use user::*;
