pub mod api;
pub mod config;
pub mod controller;
pub mod counter;
pub mod error;
pub mod format;
pub mod models;
pub mod page;

pub use api::{ApiError, BoardApi, HttpBoardClient};
pub use config::GuestbookConfig;
pub use controller::{
    BoardController, RefreshOutcome, RefreshTicket, SubmitOutcome, SubmitStart,
};
pub use counter::{CharacterCounter, CounterLevel};
pub use error::{GuestbookError, Result};
pub use format::{format_message, format_timestamp, format_timestamp_at};
pub use models::{Draft, Message, Notification, NotificationKind};
pub use page::{Field, MessageArea, Page, SubmitState};
