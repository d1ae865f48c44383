//! Transient success/error banners

use std::time::{Duration, Instant};

/// How long a banner stays fully visible
pub const NOTIFICATION_LIFETIME: Duration = Duration::from_secs(6);

/// Fade-out transition after the visible lifetime
pub const NOTIFICATION_FADE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    /// CSS class on the banner element
    pub fn css_class(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
        }
    }
}

/// Where a banner is in its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    Visible,
    Fading,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
    pub shown_at: Instant,
}

impl Notification {
    pub fn new(kind: NotificationKind, text: impl Into<String>, shown_at: Instant) -> Self {
        Self {
            kind,
            text: text.into(),
            shown_at,
        }
    }

    pub fn phase(&self, now: Instant) -> NotificationPhase {
        let age = now.saturating_duration_since(self.shown_at);
        if age < NOTIFICATION_LIFETIME {
            NotificationPhase::Visible
        } else if age < NOTIFICATION_LIFETIME + NOTIFICATION_FADE {
            NotificationPhase::Fading
        } else {
            NotificationPhase::Expired
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifetime_phases() {
        let start = Instant::now();
        let n = Notification::new(NotificationKind::Success, "ok", start);

        assert_eq!(n.phase(start), NotificationPhase::Visible);
        assert_eq!(n.phase(start + Duration::from_millis(5999)), NotificationPhase::Visible);
        assert_eq!(n.phase(start + Duration::from_secs(6)), NotificationPhase::Fading);
        assert_eq!(n.phase(start + Duration::from_millis(6299)), NotificationPhase::Fading);
        assert_eq!(n.phase(start + Duration::from_millis(6300)), NotificationPhase::Expired);
    }

    #[test]
    fn css_classes() {
        assert_eq!(NotificationKind::Success.css_class(), "success");
        assert_eq!(NotificationKind::Error.css_class(), "error");
    }
}
