//! Post-commit notification pipeline.
//!
//! Services call [`NotificationSender::emit`] only after their transaction has
//! committed. A dispatcher task drains the channel and hands each message to a
//! [`Notifier`]. Nothing on this path can fail or roll back the operation that
//! produced the event.

pub mod dispatcher;
pub mod events;
pub mod messages;

pub use dispatcher::{LogNotifier, Notifier, spawn_dispatcher};
pub use events::{NotificationEvent, NotificationSender, TripSnapshot};
