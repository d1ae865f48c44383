//! Guestbook domain models
//!
//! Messages come from the server and are never edited locally. Drafts are
//! built from the form inputs and validated before anything leaves the client.

pub mod message;
pub mod notification;
pub mod validation;

pub use message::{Draft, Message, MESSAGE_MAX_CHARS, NAME_MAX_CHARS};
pub use notification::{
    Notification, NotificationKind, NotificationPhase, NOTIFICATION_FADE, NOTIFICATION_LIFETIME,
};
pub use validation::{is_spam_like, ValidationError, ValidationErrors};
