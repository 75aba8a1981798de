//! Notification seam.
//!
//! The mutation coordinator fires `success`/`error` toasts after each
//! mutation settles. Notifications are fire-and-forget: the core never blocks
//! on or inspects the notifier's state.

use std::sync::Arc;

/// Toast sink implemented by the host UI.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// A boxed, reference-counted [`Notifier`].
pub type ArcNotifier = Arc<dyn Notifier>;

/// Routes notifications to the `log` facade; the default outside a UI host.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        log::info!("[NOTIFY] {message}");
    }

    fn error(&self, message: &str) {
        log::warn!("[NOTIFY] {message}");
    }
}

/// Swallows all notifications.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn success(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
