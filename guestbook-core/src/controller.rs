//! Board controller: form submission, refresh and rendering into the page
//!
//! The controller owns the [`Page`] and is the only thing that mutates it.
//! Each network operation is split into a `begin_*` step (synchronous state
//! change, returns what to send) and a `finish_*` step (applies the result),
//! so an event loop can run the request elsewhere and hand back the
//! completion. `submit()` and `refresh()` run both halves inline.
//!
//! Fetches are numbered with [`RefreshTicket`]s. A completion older than the
//! last one applied is dropped, so a slow periodic fetch can never overwrite
//! the list rendered after a successful post.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::api::{ApiError, BoardApi};
use crate::models::{Draft, Message, Notification, NotificationKind, ValidationErrors};
use crate::page::{Field, Page, SubmitState};

pub const SUBMIT_SUCCESS_TEXT: &str = "Message posted successfully! 🎉";
pub const SUBMIT_FAILED_TEXT: &str = "Failed to post message";
pub const SUBMIT_TRANSPORT_TEXT: &str = "Failed to post message. Please try again.";

/// Sequence number of an issued fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

/// Result of starting a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStart {
    /// Input is valid and the button is now busy; send this draft
    Ready(Draft),
    /// Validation failed; the error banner is already showing
    Invalid(ValidationErrors),
    /// A submission is already in flight
    Busy,
}

/// How a submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored; the follow-up fetch for `ticket` must be run next
    Posted(RefreshTicket),
    /// Rejected locally, nothing was sent
    Invalid(ValidationErrors),
    /// Server or transport failure; the error banner is showing
    Failed(ApiError),
    /// Ignored because another submission is in flight
    Busy,
}

/// How a fetch completion was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// List replaced with this many messages
    Rendered(usize),
    /// Container replaced with the inline error notice
    Failed,
    /// Superseded by a newer fetch and discarded
    Stale,
}

pub struct BoardController<A: BoardApi> {
    api: Arc<A>,
    page: Page,
    issued: u64,
    applied: u64,
    scroll_after: Option<RefreshTicket>,
}

impl<A: BoardApi> BoardController<A> {
    pub fn new(api: A) -> Self {
        Self::from_arc(Arc::new(api))
    }

    pub fn from_arc(api: Arc<A>) -> Self {
        Self {
            api,
            page: Page::new(),
            issued: 0,
            applied: 0,
            scroll_after: None,
        }
    }

    /// Shared handle for running requests off the event loop
    pub fn api(&self) -> Arc<A> {
        Arc::clone(&self.api)
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// One input event on a form field
    pub fn input(&mut self, field: Field, value: impl Into<String>) {
        self.page.input_mut(field).set(value);
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.page.scroll_by(delta);
    }

    /// Show a banner, replacing any visible one
    pub fn notify(&mut self, text: impl Into<String>, kind: NotificationKind) {
        self.notify_at(text, kind, Instant::now());
    }

    pub fn notify_at(&mut self, text: impl Into<String>, kind: NotificationKind, now: Instant) {
        self.page.show_notification(Notification::new(kind, text, now));
    }

    /// Expire banners; returns true if the page changed
    pub fn tick(&mut self, now: Instant) -> bool {
        self.page.expire_notification(now)
    }

    /// Validate the form and mark the button busy.
    pub fn begin_submit(&mut self) -> SubmitStart {
        if self.page.submit_state() == SubmitState::Submitting {
            return SubmitStart::Busy;
        }

        let draft = self.page.draft();
        if let Err(errors) = draft.validate() {
            debug!(count = errors.len(), "draft failed validation");
            self.notify(errors.to_string(), NotificationKind::Error);
            return SubmitStart::Invalid(errors);
        }

        self.page.set_submit_state(SubmitState::Submitting);
        SubmitStart::Ready(draft)
    }

    /// Apply the creation response. The button is released whatever happened.
    pub fn finish_submit(&mut self, result: Result<(), ApiError>) -> SubmitOutcome {
        self.page.set_submit_state(SubmitState::Idle);

        match result {
            Ok(()) => {
                info!("message posted");
                self.page.reset_form();
                self.notify(SUBMIT_SUCCESS_TEXT, NotificationKind::Success);
                let ticket = self.begin_refresh();
                self.scroll_after = Some(ticket);
                SubmitOutcome::Posted(ticket)
            }
            Err(err) => {
                let text = match &err {
                    ApiError::Rejected {
                        message: Some(message),
                        ..
                    } => message.clone(),
                    ApiError::Transport(reason) => {
                        warn!(%reason, "failed to post message");
                        SUBMIT_TRANSPORT_TEXT.to_string()
                    }
                    other => {
                        warn!(error = %other, "server refused message");
                        SUBMIT_FAILED_TEXT.to_string()
                    }
                };
                self.notify(text, NotificationKind::Error);
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Issue a new fetch ticket
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// Apply a fetch completion for `ticket`
    pub fn finish_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<Message>, ApiError>,
        fetched_at: DateTime<Local>,
    ) -> RefreshOutcome {
        let scroll = self.scroll_after == Some(ticket);
        if scroll {
            self.scroll_after = None;
            self.page.scroll_to_top();
        }

        if ticket.0 < self.applied {
            debug!(
                ticket = ticket.0,
                applied = self.applied,
                "discarding stale fetch"
            );
            return RefreshOutcome::Stale;
        }
        self.applied = ticket.0;

        match result {
            Ok(messages) => {
                let count = messages.len();
                debug!(count, "rendering messages");
                self.page.render_messages(messages, fetched_at);
                RefreshOutcome::Rendered(count)
            }
            Err(err) => {
                warn!(error = %err, "failed to load messages");
                self.page.show_load_failure();
                RefreshOutcome::Failed
            }
        }
    }

    /// Fetch and render the list
    pub async fn refresh(&mut self) -> RefreshOutcome {
        let ticket = self.begin_refresh();
        self.run_refresh(ticket).await
    }

    /// Validate, post, and on success re-fetch and scroll to the top
    pub async fn submit(&mut self) -> SubmitOutcome {
        let draft = match self.begin_submit() {
            SubmitStart::Ready(draft) => draft,
            SubmitStart::Invalid(errors) => return SubmitOutcome::Invalid(errors),
            SubmitStart::Busy => return SubmitOutcome::Busy,
        };

        let result = self.api.create_message(&draft).await;
        let outcome = self.finish_submit(result);

        if let SubmitOutcome::Posted(ticket) = &outcome {
            self.run_refresh(*ticket).await;
        }

        outcome
    }

    async fn run_refresh(&mut self, ticket: RefreshTicket) -> RefreshOutcome {
        let result = self.api.fetch_messages().await;
        self.finish_refresh(ticket, result, Local::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::MessageArea;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeApi {
        stored: Mutex<Vec<Message>>,
        create_error: Option<ApiError>,
        fetch_error: Option<ApiError>,
        creates: Mutex<usize>,
    }

    #[async_trait]
    impl BoardApi for FakeApi {
        async fn create_message(&self, draft: &Draft) -> Result<(), ApiError> {
            *self.creates.lock().unwrap() += 1;
            if let Some(err) = &self.create_error {
                return Err(err.clone());
            }
            self.stored.lock().unwrap().insert(
                0,
                Message {
                    id: None,
                    name: draft.name.clone(),
                    message: draft.message.clone(),
                    timestamp: Local::now().to_rfc3339(),
                },
            );
            Ok(())
        }

        async fn fetch_messages(&self) -> Result<Vec<Message>, ApiError> {
            match &self.fetch_error {
                Some(err) => Err(err.clone()),
                None => Ok(self.stored.lock().unwrap().clone()),
            }
        }
    }

    fn banner(c: &BoardController<FakeApi>) -> Option<(NotificationKind, String)> {
        c.page().notification().map(|n| (n.kind, n.text.clone()))
    }

    #[tokio::test]
    async fn successful_post_resets_form_and_renders_card() {
        let mut c = BoardController::new(FakeApi::default());
        c.input(Field::Name, "Ada");
        c.input(Field::Message, "Hello **world**");
        c.scroll_by(4);

        let outcome = c.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Posted(_)));
        assert_eq!(c.page().name.value(), "");
        assert_eq!(c.page().message.counter().label(), "0/500 characters");
        assert_eq!(c.page().submit_state(), SubmitState::Idle);
        assert_eq!(c.page().scroll(), 0);
        assert_eq!(
            banner(&c),
            Some((NotificationKind::Success, SUBMIT_SUCCESS_TEXT.to_string()))
        );
        let html = c.page().messages_html(Local::now());
        assert!(html.contains("Hello <strong>world</strong>"));
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_server() {
        let api = Arc::new(FakeApi::default());
        let mut c = BoardController::from_arc(Arc::clone(&api));
        c.input(Field::Name, "   ");
        c.input(Field::Message, "buy now");

        let outcome = c.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
        assert_eq!(*api.creates.lock().unwrap(), 0);
        assert_eq!(
            banner(&c),
            Some((
                NotificationKind::Error,
                "Name is required. Message appears to be spam. Please write a genuine message."
                    .to_string()
            ))
        );
        // form keeps what the user typed
        assert_eq!(c.page().message.value(), "buy now");
    }

    #[tokio::test]
    async fn server_error_text_is_shown_verbatim() {
        let api = FakeApi {
            create_error: Some(ApiError::Rejected {
                status: 400,
                message: Some("Name must be 50 characters or less".into()),
            }),
            ..Default::default()
        };
        let mut c = BoardController::new(api);
        c.input(Field::Name, "Ada");
        c.input(Field::Message, "Hi");

        let outcome = c.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(c.page().submit_state(), SubmitState::Idle);
        assert_eq!(c.page().name.value(), "Ada");
        assert_eq!(
            banner(&c),
            Some((
                NotificationKind::Error,
                "Name must be 50 characters or less".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn failures_without_server_text_use_fallbacks() {
        for (err, expected) in [
            (
                ApiError::Rejected { status: 500, message: None },
                SUBMIT_FAILED_TEXT,
            ),
            (ApiError::Transport("connection refused".into()), SUBMIT_TRANSPORT_TEXT),
        ] {
            let api = FakeApi {
                create_error: Some(err),
                ..Default::default()
            };
            let mut c = BoardController::new(api);
            c.input(Field::Name, "Ada");
            c.input(Field::Message, "Hi");
            c.submit().await;

            assert_eq!(banner(&c).map(|(_, t)| t), Some(expected.to_string()));
        }
    }

    #[test]
    fn second_submit_while_busy_is_ignored() {
        let mut c = BoardController::new(FakeApi::default());
        c.input(Field::Name, "Ada");
        c.input(Field::Message, "Hi");

        assert!(matches!(c.begin_submit(), SubmitStart::Ready(_)));
        assert_eq!(c.page().submit_state().label(), "Posting...");
        assert_eq!(c.begin_submit(), SubmitStart::Busy);

        c.finish_submit(Err(ApiError::Status(502)));
        assert_eq!(c.page().submit_state(), SubmitState::Idle);
    }

    #[tokio::test]
    async fn empty_list_renders_empty_state() {
        let mut c = BoardController::new(FakeApi::default());
        assert_eq!(c.refresh().await, RefreshOutcome::Rendered(0));
        assert_eq!(c.page().messages(), &MessageArea::Empty);
        assert_eq!(c.page().stats().map(|s| s.total), Some(0));
    }

    #[tokio::test]
    async fn fetch_failure_shows_inline_notice() {
        let api = FakeApi {
            fetch_error: Some(ApiError::Status(500)),
            ..Default::default()
        };
        let mut c = BoardController::new(api);
        assert_eq!(c.refresh().await, RefreshOutcome::Failed);
        assert_eq!(c.page().messages(), &MessageArea::Failed);
        assert!(c.page().stats().is_none());
    }

    #[test]
    fn stale_fetch_is_discarded() {
        let mut c = BoardController::new(FakeApi::default());
        let periodic = c.begin_refresh();
        let follow_up = c.begin_refresh();
        let fresh = vec![Message {
            id: Some(1),
            name: "Ada".into(),
            message: "new".into(),
            timestamp: "2024-06-15T12:00:00".into(),
        }];

        assert_eq!(
            c.finish_refresh(follow_up, Ok(fresh.clone()), Local::now()),
            RefreshOutcome::Rendered(1)
        );
        assert_eq!(
            c.finish_refresh(periodic, Ok(vec![]), Local::now()),
            RefreshOutcome::Stale
        );
        assert_eq!(c.page().messages(), &MessageArea::Cards(fresh));
    }

    #[test]
    fn follow_up_fetch_scrolls_even_when_superseded() {
        let mut c = BoardController::new(FakeApi::default());
        c.input(Field::Name, "Ada");
        c.input(Field::Message, "Hi");
        c.scroll_by(7);

        assert!(matches!(c.begin_submit(), SubmitStart::Ready(_)));
        let SubmitOutcome::Posted(follow_up) = c.finish_submit(Ok(())) else {
            panic!("expected posted");
        };
        let periodic = c.begin_refresh();
        c.finish_refresh(periodic, Ok(vec![]), Local::now());
        assert_eq!(c.page().scroll(), 7);

        assert_eq!(
            c.finish_refresh(follow_up, Ok(vec![]), Local::now()),
            RefreshOutcome::Stale
        );
        assert_eq!(c.page().scroll(), 0);
    }

    #[test]
    fn new_banner_replaces_old_and_expires() {
        let start = Instant::now();
        let mut c = BoardController::new(FakeApi::default());
        c.notify_at("first", NotificationKind::Error, start);
        c.notify_at("second", NotificationKind::Success, start);

        assert_eq!(
            banner(&c),
            Some((NotificationKind::Success, "second".to_string()))
        );
        assert!(!c.tick(start + Duration::from_secs(6)));
        assert!(c.tick(start + Duration::from_secs(7)));
        assert!(banner(&c).is_none());
    }
}
