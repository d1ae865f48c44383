//! Stored messages and submission drafts

use serde::{Deserialize, Serialize};

use super::validation::{is_spam_like, ValidationError, ValidationErrors};

/// Maximum length for the author name (characters)
pub const NAME_MAX_CHARS: usize = 50;

/// Maximum length for the message body (characters)
pub const MESSAGE_MAX_CHARS: usize = 500;

/// A guestbook entry as returned by `GET /messages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Server row id (older servers omit it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Author name
    pub name: String,
    /// Message body, unformatted
    pub message: String,
    /// Creation time as sent by the server (ISO 8601, offset optional)
    pub timestamp: String,
}

/// Form contents for one submission attempt.
///
/// Both fields are trimmed on construction; the trimmed values are what gets
/// validated and what gets posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Draft {
    pub name: String,
    pub message: String,
}

impl Draft {
    /// Build a draft from raw input values.
    ///
    /// # Example
    /// ```
    /// use guestbook_core::models::Draft;
    ///
    /// let draft = Draft::new("  Ada ", "Hello\n");
    /// assert_eq!(draft.name, "Ada");
    /// assert_eq!(draft.message, "Hello");
    /// ```
    pub fn new(name: &str, message: &str) -> Self {
        Self {
            name: name.trim().to_owned(),
            message: message.trim().to_owned(),
        }
    }

    /// Check every rule and collect all failures.
    ///
    /// # Rules
    /// - name required, at most 50 characters
    /// - message required, at most 500 characters
    /// - non-empty message must not look like spam
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        let name_len = self.name.chars().count();
        if name_len == 0 {
            errors.push(ValidationError::Required { field: "Name" });
        } else if name_len > NAME_MAX_CHARS {
            errors.push(ValidationError::TooLong {
                field: "Name",
                max: NAME_MAX_CHARS,
            });
        }

        let message_len = self.message.chars().count();
        if message_len == 0 {
            errors.push(ValidationError::Required { field: "Message" });
        } else if message_len > MESSAGE_MAX_CHARS {
            errors.push(ValidationError::TooLong {
                field: "Message",
                max: MESSAGE_MAX_CHARS,
            });
        }

        if message_len > 0 && is_spam_like(&self.message) {
            errors.push(ValidationError::Spam);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_boundary() {
        let ok = Draft::new(&"a".repeat(50), "Hello there");
        assert!(ok.validate().is_ok());

        let err = Draft::new(&"a".repeat(51), "Hello there").validate().unwrap_err();
        assert_eq!(
            err.as_slice(),
            &[ValidationError::TooLong { field: "Name", max: 50 }]
        );
    }

    #[test]
    fn message_boundary() {
        // Alternate characters so the repeated-run heuristic stays quiet
        let body_500: String = "ab".repeat(250);
        assert!(Draft::new("Ada", &body_500).validate().is_ok());

        let body_501 = format!("{}c", body_500);
        let err = Draft::new("Ada", &body_501).validate().unwrap_err();
        assert_eq!(
            err.as_slice(),
            &[ValidationError::TooLong { field: "Message", max: 500 }]
        );
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let name = "é".repeat(50);
        assert!(Draft::new(&name, "Bonjour").validate().is_ok());
    }

    #[test]
    fn collects_every_failure_in_order() {
        let err = Draft::new("   ", "").validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Name is required. Message is required."
        );

        let err = Draft::new(&"n".repeat(60), "FREE stuff").validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Name must be 50 characters or less. \
             Message appears to be spam. Please write a genuine message."
        );
    }

    #[test]
    fn trims_before_validating() {
        let draft = Draft::new("\tAda\n", "  hi  ");
        assert_eq!(draft, Draft { name: "Ada".into(), message: "hi".into() });
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn deserializes_server_rows() {
        let json = r#"[
            {"id": 3, "name": "Bob", "message": "Hi", "timestamp": "2024-05-01T10:00:00"},
            {"name": "Eve", "message": "Yo", "timestamp": "2024-05-01T09:00:00"}
        ]"#;
        let messages: Vec<Message> = serde_json::from_str(json).unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, Some(3));
        assert_eq!(messages[1].id, None);
        assert_eq!(messages[1].name, "Eve");
    }

    #[test]
    fn draft_serializes_as_submit_payload() {
        let json = serde_json::to_value(Draft::new(" Ada ", " Hi ")).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Ada", "message": "Hi"}));
    }
}
