//! Progress feedback for one-shot commands
//!
//! # Quiet Mode
//!
//! Spinners are suppressed when:
//! - `--quiet` flag is passed
//! - `GUESTBOOK_QUIET=1` environment variable is set
//! - stderr is not a TTY (piped output)

use std::io::IsTerminal;
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Global quiet mode state
static QUIET_MODE: OnceLock<bool> = OnceLock::new();

/// Initialize quiet mode from flags and environment
///
/// Call this once at startup with the --quiet flag value.
pub fn init_quiet_mode(quiet_flag: bool) {
    let is_quiet = quiet_flag
        || std::env::var("GUESTBOOK_QUIET").map(|v| v == "1").unwrap_or(false)
        || !std::io::stderr().is_terminal();

    QUIET_MODE.set(is_quiet).ok();
}

pub fn is_quiet() -> bool {
    *QUIET_MODE.get().unwrap_or(&false)
}

/// Create a spinner that respects quiet mode
pub fn spinner(msg: impl Into<String>) -> Option<ProgressBar> {
    if is_quiet() {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("{spinner:.cyan} {msg}")
            .expect("valid template"),
    );
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(80));
    Some(pb)
}

/// Stop a spinner and clear its line
pub fn finish(pb: Option<ProgressBar>) {
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
}

/// Finish a spinner with a success message
pub fn finish_success(pb: Option<ProgressBar>, msg: impl Into<String>) {
    if let Some(pb) = pb {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{msg}")
                .expect("valid template"),
        );
        pb.finish_with_message(format!("✓ {}", msg.into()));
    }
}

/// Finish a spinner with an error message
pub fn finish_error(pb: Option<ProgressBar>, msg: impl Into<String>) {
    if let Some(pb) = pb {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{msg}")
                .expect("valid template"),
        );
        pb.finish_with_message(format!("✗ {}", msg.into()));
    }
}
