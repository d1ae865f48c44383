//! Page model driven by the board controller
//!
//! The page is the single owned view state: form inputs with their counters,
//! the submit button, the banner slot, the message container and the stats
//! strip. Hosts read it to draw (terminal UI) or serialize it with
//! [`Page::to_html`].

use std::fmt::Write as _;
use std::time::Instant;

use chrono::{DateTime, Local};

use crate::counter::CharacterCounter;
use crate::format::{escape_html, format_clock, format_message, format_timestamp_at};
use crate::models::{
    Draft, Message, Notification, NotificationPhase, MESSAGE_MAX_CHARS, NAME_MAX_CHARS,
};

pub const SUBMIT_LABEL: &str = "Post Message";
pub const SUBMIT_BUSY_LABEL: &str = "Posting...";
pub const LOADING_TEXT: &str = "Loading messages...";
pub const EMPTY_STATE_TEXT: &str = "No messages yet. Be the first to leave a message!";
pub const LOAD_FAILED_TEXT: &str = "Failed to load messages. Please refresh the page.";

/// Form input identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Message,
}

/// Text input with its live counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    counter: CharacterCounter,
}

impl TextInput {
    pub fn new(max: usize) -> Self {
        Self {
            value: String::new(),
            counter: CharacterCounter::new(max),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn counter(&self) -> &CharacterCounter {
        &self.counter
    }

    /// Replace the value and refresh the counter (one input event)
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.counter.update(&self.value);
    }

    pub fn clear(&mut self) {
        self.set(String::new());
    }
}

/// Submit button state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
}

impl SubmitState {
    pub fn label(&self) -> &'static str {
        match self {
            SubmitState::Idle => SUBMIT_LABEL,
            SubmitState::Submitting => SUBMIT_BUSY_LABEL,
        }
    }

    pub fn is_disabled(&self) -> bool {
        *self == SubmitState::Submitting
    }
}

/// Contents of the message container
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MessageArea {
    /// Nothing fetched yet
    #[default]
    Loading,
    /// Last fetch returned no messages
    Empty,
    /// Last fetch, in server order
    Cards(Vec<Message>),
    /// Last fetch failed
    Failed,
}

/// Count and time of the last successful fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsStrip {
    pub total: usize,
    pub fetched_at: DateTime<Local>,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub name: TextInput,
    pub message: TextInput,
    submit: SubmitState,
    notification: Option<Notification>,
    messages: MessageArea,
    stats: Option<StatsStrip>,
    scroll: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        Self {
            name: TextInput::new(NAME_MAX_CHARS),
            message: TextInput::new(MESSAGE_MAX_CHARS),
            submit: SubmitState::Idle,
            notification: None,
            messages: MessageArea::Loading,
            stats: None,
            scroll: 0,
        }
    }

    pub fn input(&self, field: Field) -> &TextInput {
        match field {
            Field::Name => &self.name,
            Field::Message => &self.message,
        }
    }

    pub fn input_mut(&mut self, field: Field) -> &mut TextInput {
        match field {
            Field::Name => &mut self.name,
            Field::Message => &mut self.message,
        }
    }

    /// Trimmed draft from the current form values
    pub fn draft(&self) -> Draft {
        Draft::new(self.name.value(), self.message.value())
    }

    /// Clear both inputs; counters follow the cleared values
    pub fn reset_form(&mut self) {
        self.name.clear();
        self.message.clear();
    }

    pub fn submit_state(&self) -> SubmitState {
        self.submit
    }

    pub fn set_submit_state(&mut self, state: SubmitState) {
        self.submit = state;
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Replace whatever banner is showing
    pub fn show_notification(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    /// Drop the banner once its fade has finished. Returns true if one was removed.
    pub fn expire_notification(&mut self, now: Instant) -> bool {
        match &self.notification {
            Some(n) if n.phase(now) == NotificationPhase::Expired => {
                self.notification = None;
                true
            }
            _ => false,
        }
    }

    pub fn messages(&self) -> &MessageArea {
        &self.messages
    }

    pub fn stats(&self) -> Option<&StatsStrip> {
        self.stats.as_ref()
    }

    /// Full replace of the container and stats strip with a fetched list
    pub fn render_messages(&mut self, messages: Vec<Message>, fetched_at: DateTime<Local>) {
        self.stats = Some(StatsStrip {
            total: messages.len(),
            fetched_at,
        });
        self.messages = if messages.is_empty() {
            MessageArea::Empty
        } else {
            MessageArea::Cards(messages)
        };
    }

    /// Swap the container for the inline error notice
    pub fn show_load_failure(&mut self) {
        self.messages = MessageArea::Failed;
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll = self.scroll.saturating_add_signed(delta);
    }

    /// Inner HTML of the message container
    pub fn messages_html(&self, now: DateTime<Local>) -> String {
        match &self.messages {
            MessageArea::Loading => format!(r#"<div class="loading">{}</div>"#, LOADING_TEXT),
            MessageArea::Empty => format!(r#"<div class="empty-state">{}</div>"#, EMPTY_STATE_TEXT),
            MessageArea::Failed => format!(r#"<div class="error">{}</div>"#, LOAD_FAILED_TEXT),
            MessageArea::Cards(messages) => {
                let mut html = String::new();
                for (index, message) in messages.iter().enumerate() {
                    let _ = write!(
                        html,
                        concat!(
                            "\n<div class=\"message-card\" style=\"animation-delay: {delay}s\">\n",
                            "    <div class=\"message-header\">\n",
                            "        <span class=\"message-author\">{author}</span>\n",
                            "        <span class=\"message-date\">{date}</span>\n",
                            "    </div>\n",
                            "    <div class=\"message-content\">{content}</div>\n",
                            "</div>\n"
                        ),
                        delay = index as f64 / 10.0,
                        author = escape_html(&message.name),
                        date = format_timestamp_at(&message.timestamp, now),
                        content = format_message(&message.message),
                    );
                }
                html
            }
        }
    }

    /// Stats bar markup, if a fetch has succeeded
    pub fn stats_html(&self) -> Option<String> {
        self.stats.map(|stats| {
            format!(
                concat!(
                    "<div class=\"stats-bar\">\n",
                    "    <span>📊 Total Messages: <strong>{}</strong></span>\n",
                    "    <span>🕒 Last Updated: <strong>{}</strong></span>\n",
                    "</div>"
                ),
                stats.total,
                format_clock(stats.fetched_at)
            )
        })
    }

    fn notification_html(&self, now: Instant) -> Option<String> {
        let n = self.notification.as_ref()?;
        let style = match n.phase(now) {
            NotificationPhase::Visible => "",
            NotificationPhase::Fading => r#" style="opacity: 0; transform: translateY(-10px)""#,
            NotificationPhase::Expired => return None,
        };
        Some(format!(
            r#"<div class="{}"{}>{}</div>"#,
            n.kind.css_class(),
            style,
            escape_html(&n.text)
        ))
    }

    fn counter_html(input: &TextInput) -> String {
        let counter = input.counter();
        let class = match counter.level().css_class() {
            Some(level) => format!("character-count {}", level),
            None => "character-count".to_string(),
        };
        format!(r#"<div class="{}">{}</div>"#, class, counter.label())
    }

    /// Serialize the whole page as an HTML document
    pub fn to_html(&self, now: DateTime<Local>, instant: Instant) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n<title>Guestbook</title>\n</head>\n<body>\n");
        html.push_str("<main class=\"container\">\n<h1>Guestbook</h1>\n");

        if let Some(banner) = self.notification_html(instant) {
            html.push_str(&banner);
            html.push('\n');
        }

        let disabled = if self.submit.is_disabled() { " disabled" } else { "" };
        let _ = write!(
            html,
            concat!(
                "<form id=\"guestbook-form\" method=\"post\" action=\"/submit\">\n",
                "<div class=\"form-group\">\n",
                "<label for=\"name\">Name</label>\n",
                "<input type=\"text\" id=\"name\" name=\"name\" value=\"{name}\">\n",
                "{name_counter}\n",
                "</div>\n",
                "<div class=\"form-group\">\n",
                "<label for=\"message\">Message</label>\n",
                "<textarea id=\"message\" name=\"message\">{message}</textarea>\n",
                "{message_counter}\n",
                "</div>\n",
                "<button type=\"submit\"{disabled}>{label}</button>\n",
                "</form>\n"
            ),
            name = escape_html(self.name.value()),
            name_counter = Self::counter_html(&self.name),
            message = escape_html(self.message.value()),
            message_counter = Self::counter_html(&self.message),
            disabled = disabled,
            label = self.submit.label(),
        );

        html.push_str("<section class=\"messages-section\">\n<h2>Messages</h2>\n");
        let _ = write!(
            html,
            "<div id=\"messages-container\">{}</div>\n",
            self.messages_html(now)
        );
        if let Some(stats) = self.stats_html() {
            html.push_str(&stats);
            html.push('\n');
        }
        html.push_str("</section>\n</main>\n</body>\n</html>\n");
        html
    }
}
