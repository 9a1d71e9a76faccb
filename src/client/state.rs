use tokio::sync::watch;

use crate::client::session::SessionUser;
use crate::models::{Chat, ChatKey, ChatMessage};

/// Everything the front-end renders from. Cloned out on read; mutated only
/// through [`AppState::update`].
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub session: Option<SessionUser>,
    pub selected_store: Option<u64>,
    pub active_chat: Option<ChatKey>,
    pub chats: Vec<Chat>,
    pub conversation: Vec<ChatMessage>,
}

/// Shared client state. All writes funnel through one function so every
/// subscriber sees each change exactly once, in order.
#[derive(Clone)]
pub struct AppState {
    tx: watch::Sender<Snapshot>,
}

impl AppState {
    pub fn new(initial: Snapshot) -> AppState {
        let (tx, _) = watch::channel(initial);
        AppState { tx }
    }

    pub fn update(&self, f: impl FnOnce(&mut Snapshot)) {
        self.tx.send_modify(f);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.tx.borrow().clone()
    }

    /// Receiver that wakes on every update. Dropping it is how a subscriber
    /// unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.tx.subscribe()
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(Snapshot::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_see_updates() {
        let state = AppState::default();
        let mut rx = state.subscribe();

        state.update(|snapshot| snapshot.selected_store = Some(3));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().selected_store, Some(3));
        assert_eq!(state.snapshot().selected_store, Some(3));
    }

    #[tokio::test]
    async fn updates_are_observed_in_order() {
        let state = AppState::default();

        state.update(|snapshot| snapshot.selected_store = Some(1));
        state.update(|snapshot| snapshot.selected_store = Some(2));

        // A late subscriber sees the latest value, not an intermediate one.
        assert_eq!(state.subscribe().borrow().selected_store, Some(2));
    }
}
