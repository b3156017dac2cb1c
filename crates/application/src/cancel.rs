//! Run-level cancellation.

use std::sync::Arc;

use tokio::sync::watch;

/// A clonable token that propagates run-level cancellation into in-flight
/// capture operations.
///
/// Cancelling is idempotent and never blocks. Completed results are not
/// affected; only work still in flight observes the token.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl CancellationToken {
    /// Creates a token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    /// Signals cancellation to every clone of this token.
    pub fn cancel(&self) {
        let _ = self.sender.send(true);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once cancellation is signalled. Resolves immediately if the
    /// token is already cancelled.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        // The sender lives inside this token, so wait_for can only fail if
        // every clone is gone, at which point nobody is awaiting.
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
