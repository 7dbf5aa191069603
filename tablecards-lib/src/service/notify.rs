//! Where failed operations are reported.

use crate::error::Error;

/// Receives every error a [`TableService`](super::TableService) operation
/// returns, e.g. to show a toast. The error is still returned to the caller.
pub trait Notifier: Send + Sync {
    fn notify_error(&self, error: &Error);
}

/// Notifier that writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_error(&self, error: &Error) {
        log::error!("{}", error.user_message());
    }
}
