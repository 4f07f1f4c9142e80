pub mod cors;
pub mod identity;

pub use cors::create_cors;
pub use identity::{CallerId, IDENTITY_HEADER, IdentityMiddleware};
