//! Notifier that reports notifications as structured log events.

use crate::board::ports::{Notification, Notifier, Severity};

/// Emits each notification as a `tracing` event.
///
/// Blocking notifications are logged at error level, warnings at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let task_id = notification.task_id.map(|id| id.value());
        match notification.severity {
            Severity::Blocking => tracing::error!(
                kind = ?notification.kind,
                task_id,
                detail = %notification.detail,
                "{}",
                notification.message
            ),
            Severity::Warning => tracing::warn!(
                kind = ?notification.kind,
                task_id,
                detail = %notification.detail,
                "{}",
                notification.message
            ),
        }
    }
}
