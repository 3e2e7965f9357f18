//! User-facing notifications.
//!
//! The storefront reports the outcome of user actions as short transient
//! messages. Rendering is up to the front end; this module only describes
//! them and routes them to a [`NotificationSink`].
//!
//! A notification is shown for [`DISPLAY_DURATION_MS`], then fades out over
//! [`FADE_DURATION_MS`] before it is removed.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// How long a notification stays fully visible.
pub const DISPLAY_DURATION_MS: i64 = 3_000;

/// Length of the fade-out transition after the display period.
pub const FADE_DURATION_MS: i64 = 300;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create a notification stamped with the current time.
    #[must_use]
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, NotificationKind::Error)
    }

    /// When the fade-out transition begins.
    #[must_use]
    pub fn fade_starts_at(&self) -> DateTime<Utc> {
        self.created_at + TimeDelta::milliseconds(DISPLAY_DURATION_MS)
    }

    /// When the notification is removed.
    #[must_use]
    pub fn dismissed_at(&self) -> DateTime<Utc> {
        self.fade_starts_at() + TimeDelta::milliseconds(FADE_DURATION_MS)
    }

    /// Returns true once the notification has been removed at `now`.
    #[must_use]
    pub fn is_dismissed(&self, now: DateTime<Utc>) -> bool {
        now >= self.dismissed_at()
    }
}

/// Destination for notifications.
///
/// # Implementations
///
/// - [`NotificationLog`] - Records notifications for the caller to render
/// - [`TracingSink`] - Writes notifications to the log
/// - [`NoopSink`] - Discards notifications
pub trait NotificationSink {
    /// Deliver a notification. Must not fail.
    fn notify(&self, notification: Notification);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Rc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Records every notification in order.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: RefCell<Vec<Notification>>,
}

impl NotificationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn entries(&self) -> Vec<Notification> {
        self.entries.borrow().clone()
    }

    /// The most recent notification.
    #[must_use]
    pub fn last(&self) -> Option<Notification> {
        self.entries.borrow().last().cloned()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl NotificationSink for NotificationLog {
    fn notify(&self, notification: Notification) {
        self.entries.borrow_mut().push(notification);
    }
}

/// Writes notifications to `tracing`: success at `info`, error at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                tracing::info!(text = %notification.message, "Notification");
            }
            NotificationKind::Error => {
                tracing::warn!(text = %notification.message, "Notification");
            }
        }
    }
}

/// Discards all notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NotificationSink for NoopSink {
    fn notify(&self, _notification: Notification) {}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_timing() {
        let notification = Notification::success("Saved");
        let fade = notification.fade_starts_at() - notification.created_at;
        let gone = notification.dismissed_at() - notification.created_at;

        assert_eq!(fade.num_milliseconds(), 3_000);
        assert_eq!(gone.num_milliseconds(), 3_300);
        assert!(!notification.is_dismissed(notification.created_at));
        assert!(notification.is_dismissed(notification.dismissed_at()));
    }

    #[test]
    fn test_log_records_in_order() {
        let log = NotificationLog::new();
        log.notify(Notification::success("one"));
        log.notify(Notification::error("two"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.last().unwrap().message, "two");
        assert!(log.last().unwrap().is_error());

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].kind, NotificationKind::Success);
        assert!(log.is_empty());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&NotificationKind::Error).unwrap();
        assert_eq!(json, "\"error\"");
        assert_eq!(NotificationKind::Success.to_string(), "success");
    }

    #[test]
    fn test_rc_sink_forwards() {
        let log = Rc::new(NotificationLog::new());
        let sink: Rc<dyn NotificationSink> = log.clone();
        sink.notify(Notification::success("hi"));
        assert_eq!(log.len(), 1);
    }
}
