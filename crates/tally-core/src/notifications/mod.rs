//! Notifications derived from budgets and recent transactions
//!
//! [`derive_notifications`] is a pure function of the snapshot; the
//! [`NotificationInbox`] layers read and cleared state on top of it.

pub mod deriver;
pub mod inbox;
pub mod types;

pub use deriver::{
    derive_notifications, derive_with_preferences, NotificationPreferences, MAX_NOTIFICATIONS,
};
pub use inbox::{NotificationInbox, REMEMBERED_IDS_LIMIT};
pub use types::{Notification, NotificationType, Priority};
