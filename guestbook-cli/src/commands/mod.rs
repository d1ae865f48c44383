//! Command implementations for the guestbook CLI

pub mod board;

// Re-export main dispatcher functions for flat access from main.rs
pub use board::{run_list, run_post, run_render};
