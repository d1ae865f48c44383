//! Watch mode - the guestbook board in the terminal
//!
//! - Name and message inputs with live character counters
//! - Success/error banner that fades after a few seconds
//! - Message cards with bold/italic rendering and relative times
//! - Periodic refresh plus Ctrl+R

pub mod app;
pub mod event;
pub mod markup;
pub mod terminal;
pub mod ui;

pub use terminal::run;
