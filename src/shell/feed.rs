//! Follows the conversation of whichever screen is mounted.

use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::Shell;
use crate::messaging::ChatEvent;

/// Chat events of the mounted screen, kept across commands.
///
/// The receiver is replaced only when the navigator mounts a new screen, so
/// events queued for the current conversation survive commands that leave the
/// screen in place.
#[derive(Debug, Default)]
pub struct ChatFeed {
    mount: Option<u64>,
    events: Option<broadcast::Receiver<ChatEvent>>,
}

impl ChatFeed {
    pub fn new(shell: &Shell) -> Self {
        let mut feed = Self::default();
        feed.follow(shell);
        feed
    }

    /// Resubscribe if a different screen was mounted since the last call.
    /// Returns `true` when it did.
    pub fn follow(&mut self, shell: &Shell) -> bool {
        let mount = shell.navigator().mounts();
        if self.mount == Some(mount) {
            return false;
        }
        self.mount = Some(mount);
        self.events = shell.subscribe();
        debug!(
            view = %shell.navigator().view(),
            following = self.events.is_some(),
            "Chat feed resubscribed"
        );
        true
    }

    pub fn is_following(&self) -> bool {
        self.events.is_some()
    }

    /// Next chat event. Never resolves while the screen has no conversation.
    pub async fn next(&mut self) -> ChatEvent {
        loop {
            let Some(rx) = self.events.as_mut() else {
                return std::future::pending().await;
            };
            match rx.recv().await {
                Ok(event) => return event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Chat events lagged");
                }
                Err(broadcast::error::RecvError::Closed) => self.events = None,
            }
        }
    }
}
