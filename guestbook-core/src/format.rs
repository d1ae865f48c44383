//! Message body and timestamp formatting
//!
//! `format_message` produces HTML fragments for message cards. User text is
//! always escaped before any markup is introduced, so the only tags that can
//! appear in the output are `<br>`, `<strong>` and `<em>`.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder for timestamps that cannot be parsed
pub const UNKNOWN_DATE: &str = "Unknown date";

// Emphasis never crosses a line terminator (`\n` is already `<br>` by then)
static BOLD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*([^\r\u{2028}\u{2029}]*?)\*\*").expect("invalid bold regex")
});

static ITALIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*([^\r\u{2028}\u{2029}]*?)\*").expect("invalid italic regex")
});

/// Naive layouts the server has been seen to emit (Python `isoformat()` and friends)
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Escape every markup-significant character.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a message body as an HTML fragment.
///
/// # Example
/// ```
/// use guestbook_core::format::format_message;
///
/// assert_eq!(format_message("Hello **world**"), "Hello <strong>world</strong>");
/// assert_eq!(format_message("a\n*b*"), "a<br><em>b</em>");
/// assert_eq!(format_message("<b>"), "&lt;b&gt;");
/// ```
pub fn format_message(body: &str) -> String {
    let escaped = escape_html(body).replace('\n', "<br>");
    let bolded = BOLD_RE.replace_all(&escaped, "<strong>$1</strong>");
    ITALIC_RE.replace_all(&bolded, "<em>$1</em>").into_owned()
}

/// Parse a server timestamp.
///
/// Offsets are honoured; naive date-times are local time; a bare date is
/// midnight UTC. A naive time inside a DST gap moves forward an hour.
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Local>> {
    let ts = ts.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Local));
    }

    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(ts, layout) {
            return resolve_local(&Local, &naive);
        }
    }

    NaiveDate::parse_from_str(ts, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(&Local))
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(*naive + Duration::hours(1))).earliest())
}

/// Relative timestamp against the current local time.
pub fn format_timestamp(ts: &str) -> String {
    format_timestamp_at(ts, Local::now())
}

/// Relative timestamp against an explicit `now`.
pub fn format_timestamp_at(ts: &str, now: DateTime<Local>) -> String {
    let Some(when) = parse_timestamp(ts) else {
        return UNKNOWN_DATE.to_string();
    };

    let minutes = (now - when).num_seconds().div_euclid(60);

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{} min ago", minutes)
    } else if minutes < 60 * 24 {
        format!("{}h ago", minutes / 60)
    } else if minutes < 60 * 24 * 7 {
        format!("{}d ago", minutes / (60 * 24))
    } else {
        when.format("%b %-d, %Y, %I:%M %p").to_string()
    }
}

/// Wall-clock time for the stats strip (e.g. `3:07:45 PM`).
pub fn format_clock(at: DateTime<Local>) -> String {
    at.format("%-I:%M:%S %p").to_string()
}
