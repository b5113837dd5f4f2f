//! Process shutdown request shared between tasks and the host

use std::sync::Arc;
use tokio::sync::watch;

/// One-shot, cloneable shutdown request
///
/// All clones observe the same request. Once requested it stays requested.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Ask the host to shut down
    pub fn request(&self) {
        self.sender.send_replace(true);
    }

    #[must_use]
    pub fn is_requested(&self) -> bool {
        *self.sender.borrow()
    }

    /// Wait until shutdown has been requested
    pub async fn requested(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives in `self`, so the channel cannot close while waiting
        let _ = receiver.wait_for(|requested| *requested).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
