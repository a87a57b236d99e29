//! Notification sink collaborator
//!
//! The client can surface errors and server-declared messages through a
//! visual notification system. That system is external; this trait is its
//! fire-and-forget surface. Implementations must never block or panic — the
//! client never observes the outcome of a notification.

use crate::http::NotificationKind;

/// Fire-and-forget notification sink.
pub trait Notifier: Send + Sync {
    /// Surface a message of the given kind.
    fn notify(&self, kind: NotificationKind, message: &str);
}

/// Sink that drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _kind: NotificationKind, _message: &str) {}
}

/// Sink that routes notifications to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Error | NotificationKind::Warning => {
                tracing::warn!(?kind, "{message}");
            }
            NotificationKind::Success | NotificationKind::Info => {
                tracing::info!(?kind, "{message}");
            }
        }
    }
}
