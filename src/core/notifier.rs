//! Notification sink that writes to the tracing log

use crate::core::traits::{NoticeKind, Notifier, Sound};

/// Notifier for headless runs
///
/// Notifications become log events; sound cues are logged at debug level
/// since there is nothing to play them on.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Success => tracing::info!(target: "notify", "{}", message),
            NoticeKind::Error => tracing::warn!(target: "notify", "{}", message),
        }
    }

    fn play_sound(&self, sound: Sound) {
        tracing::debug!(target: "notify", ?sound, "sound cue");
    }

    fn alert(&self, message: &str) {
        tracing::warn!(target: "notify", alert = true, "{}", message);
    }
}
