//! Guestbook HTTP API: the two endpoints the board consumes
//!
//! - `POST {endpoint}/submit` with `{ name, message }`
//! - `GET {endpoint}/messages` returning `[{ name, message, timestamp }]`

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::error::{GuestbookError, Result};
use crate::models::{Draft, Message};

/// Failure talking to the guestbook server
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Submission refused with a non-2xx status; `message` is the server's `error` field
    #[error("server rejected submission with status {status}")]
    Rejected { status: u16, message: Option<String> },

    /// Non-2xx status on fetch
    #[error("server returned status {0}")]
    Status(u16),

    /// Request never completed (connect, DNS, TLS, reset...)
    #[error("transport error: {0}")]
    Transport(String),

    /// 2xx response whose body was not the expected JSON
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// The server side of the board, as seen by the controller
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// Store a new message
    async fn create_message(&self, draft: &Draft) -> std::result::Result<(), ApiError>;

    /// Every stored message, in server order
    async fn fetch_messages(&self) -> std::result::Result<Vec<Message>, ApiError>;
}

#[derive(Deserialize, Debug)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
}

/// `BoardApi` over HTTP with reqwest
#[derive(Debug, Clone)]
pub struct HttpBoardClient {
    client: Client,
    endpoint: String,
}

impl HttpBoardClient {
    /// Create a client for `endpoint` (e.g. `http://127.0.0.1:5000`).
    ///
    /// `insecure` skips TLS certificate verification.
    pub fn new(endpoint: &str, insecure: bool) -> Result<Self> {
        let endpoint = normalize_endpoint(endpoint)?;

        let builder = Client::builder();
        let builder = if insecure {
            builder.danger_accept_invalid_certs(true)
        } else {
            builder
        };
        let client = builder
            .build()
            .map_err(|e| GuestbookError::client(e.to_string()))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }
}

#[async_trait]
impl BoardApi for HttpBoardClient {
    async fn create_message(&self, draft: &Draft) -> std::result::Result<(), ApiError> {
        let url = self.url("/submit");
        debug!(%url, "posting message");

        let response = self.client.post(&url).json(draft).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        // Error bodies are best-effort: anything but `{ "error": "..." }` means no message
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|e| e.error)
            .filter(|e| !e.is_empty());

        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch_messages(&self) -> std::result::Result<Vec<Message>, ApiError> {
        let url = self.url("/messages");
        debug!(%url, "fetching messages");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let messages = response.json::<Vec<Message>>().await?;
        debug!(count = messages.len(), "fetched messages");
        Ok(messages)
    }
}

/// Require an http(s) base URL with a host and drop trailing slashes
fn normalize_endpoint(endpoint: &str) -> Result<String> {
    let trimmed = endpoint.trim().trim_end_matches('/');

    let url = Url::parse(trimmed)
        .map_err(|e| GuestbookError::invalid_endpoint(endpoint, e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(GuestbookError::invalid_endpoint(
            endpoint,
            "scheme must be http or https",
        ));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(GuestbookError::invalid_endpoint(endpoint, "missing host"));
    }

    Ok(trimmed.to_string())
}
