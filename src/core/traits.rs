//! Core traits for the collaborators the ledger depends on
//!
//! This module defines the seams that let the ledger run against real time,
//! real notification sinks and a simulated mail gateway in production, and
//! against deterministic substitutes in tests.

use crate::types::{DeliveryError, ReceiptMessage};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;

    /// Today's date in UTC
    ///
    /// Used for the form's default date. Implementations that advance on
    /// every `now_millis` call should override this so reading the date does
    /// not consume a tick.
    fn today(&self) -> NaiveDate {
        DateTime::<Utc>::from_timestamp_millis(self.now_millis())
            .unwrap_or_default()
            .date_naive()
    }
}

/// Kind of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Sound cue played alongside a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Success,
    Error,
    Notification,
}

/// Fire-and-forget notification sink
///
/// Implementations must not fail: playback or display problems are logged
/// and swallowed.
pub trait Notifier: Send + Sync {
    /// Show a non-blocking notification
    fn notify(&self, kind: NoticeKind, message: &str);

    /// Play a sound cue
    fn play_sound(&self, sound: Sound);

    /// Show a blocking message for a user-correctable error
    fn alert(&self, message: &str) {
        self.notify(NoticeKind::Error, message);
    }
}

/// Capability that delivers a receipt to its recipient
///
/// A send resolves after whatever latency the gateway has. Any error is
/// recorded by the workflow as a failed delivery.
#[async_trait]
pub trait DeliveryGateway: Send + Sync {
    /// Attempt delivery of one receipt
    async fn send(&self, message: &ReceiptMessage) -> Result<(), DeliveryError>;
}
