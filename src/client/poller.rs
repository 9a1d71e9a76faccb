use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::http::ChatSource;
use crate::client::state::AppState;

pub const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Background chat refresher. Every tick it fetches all conversations,
/// keeps the ones involving the logged-in user and publishes them through
/// the app state, along with the messages of the active conversation.
///
/// Rather than cancelling an in-flight request, [`ChatPoller::invalidate`]
/// bumps a generation counter; a fetch that started under an older
/// generation is discarded when it lands, so a reply belonging to the
/// previous conversation can never flash into the new one.
pub struct ChatPoller {
    generation: Arc<AtomicU64>,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ChatPoller {
    pub fn spawn(source: Arc<dyn ChatSource>, state: AppState, interval: Duration) -> ChatPoller {
        let generation = Arc::new(AtomicU64::new(0));
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let task_generation = Arc::clone(&generation);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        poll_once(source.as_ref(), &state, &task_generation).await;
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            log::debug!("💬 Chat poller stopped");
        });

        ChatPoller {
            generation,
            shutdown,
            handle,
        }
    }

    /// Mark every in-flight poll stale. Called when the active conversation
    /// changes or the user logs out.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}

pub(crate) async fn poll_once(source: &dyn ChatSource, state: &AppState, generation: &AtomicU64) {
    let me = match state.snapshot().session {
        Some(session) => session.participant(),
        None => return,
    };

    let started = generation.load(Ordering::SeqCst);
    match source.fetch_chats().await {
        Ok(chats) => {
            if generation.load(Ordering::SeqCst) != started {
                log::debug!("⏭️  Discarding stale chat poll");
                return;
            }
            let mine: Vec<_> = chats.into_iter().filter(|c| c.involves(me)).collect();
            state.update(|snapshot| {
                snapshot.conversation = match snapshot.active_chat {
                    Some(key) => {
                        let canonical = key.to_string();
                        mine.iter()
                            .find(|c| c.chat_id == canonical)
                            .map(|c| c.messages.clone())
                            .unwrap_or_default()
                    }
                    None => Vec::new(),
                };
                snapshot.chats = mine;
            });
        }
        // Polling is best-effort; the next tick will try again.
        Err(e) => log::debug!("💬 Chat poll failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;

    use crate::client::http::ClientError;
    use crate::client::session::SessionUser;
    use crate::client::state::Snapshot;
    use crate::models::{
        AccountStatus, Chat, ChatKey, ChatMessage, Customer, Participant, ParticipantKind,
    };

    fn me() -> SessionUser {
        SessionUser::Customer(Customer {
            id: 3,
            name: "John Doe".into(),
            phone: "+91 111".into(),
            email: "john@example.com".into(),
            location: "Sector 15".into(),
            password: None,
            status: AccountStatus::Active,
            created_at: Utc::now(),
        })
    }

    fn chat(customer_id: u64, shopkeeper_id: u64, text: &str) -> Chat {
        let now = Utc::now();
        Chat {
            chat_id: format!("customer_{}_shopkeeper_{}", customer_id, shopkeeper_id),
            participant1_type: ParticipantKind::Customer,
            participant1_id: customer_id,
            participant2_type: ParticipantKind::Shopkeeper,
            participant2_id: shopkeeper_id,
            messages: vec![ChatMessage {
                id: uuid::Uuid::new_v4(),
                sender_id: shopkeeper_id,
                sender_type: ParticipantKind::Shopkeeper,
                message: text.into(),
                created_at: now,
            }],
            last_message: Some(text.into()),
            last_message_time: Some(now),
        }
    }

    fn state_with_session() -> AppState {
        AppState::new(Snapshot {
            session: Some(me()),
            ..Snapshot::default()
        })
    }

    struct FixedChats(Vec<Chat>);

    #[async_trait]
    impl ChatSource for FixedChats {
        async fn fetch_chats(&self) -> Result<Vec<Chat>, ClientError> {
            Ok(self.0.clone())
        }
    }

    struct CountingSource(AtomicU64);

    #[async_trait]
    impl ChatSource for CountingSource {
        async fn fetch_chats(&self) -> Result<Vec<Chat>, ClientError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    /// Bumps the shared generation counter mid-fetch, simulating the user
    /// switching conversations while a poll is on the wire.
    struct InvalidatingSource(Arc<AtomicU64>);

    #[async_trait]
    impl ChatSource for InvalidatingSource {
        async fn fetch_chats(&self) -> Result<Vec<Chat>, ClientError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(vec![chat(3, 7, "stale reply")])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn poller_keeps_only_my_conversations() {
        let state = state_with_session();
        state.update(|s| {
            s.active_chat =
                Some(ChatKey::new(Participant::customer(3), Participant::shopkeeper(7)).unwrap())
        });

        let source = Arc::new(FixedChats(vec![
            chat(3, 7, "Yes, 20kg left."),
            chat(99, 7, "someone else's thread"),
        ]));
        let poller = ChatPoller::spawn(source, state.clone(), POLL_INTERVAL);

        tokio::time::sleep(Duration::from_secs(4)).await;
        poller.stop().await;

        let snapshot = state.snapshot();
        assert_eq!(snapshot.chats.len(), 1);
        assert_eq!(snapshot.chats[0].chat_id, "customer_3_shopkeeper_7");
        assert_eq!(snapshot.conversation.len(), 1);
        assert_eq!(snapshot.conversation[0].message, "Yes, 20kg left.");
    }

    #[tokio::test]
    async fn invalidated_poll_is_discarded() {
        let state = state_with_session();
        let generation = Arc::new(AtomicU64::new(0));
        let source = InvalidatingSource(Arc::clone(&generation));

        poll_once(&source, &state, &generation).await;

        // The fetch returned data, but the generation moved while it was in
        // flight, so nothing was published.
        assert!(state.snapshot().chats.is_empty());
        assert!(state.snapshot().conversation.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_polling() {
        let state = state_with_session();
        let source = Arc::new(CountingSource(AtomicU64::new(0)));
        let poller = ChatPoller::spawn(Arc::clone(&source) as Arc<dyn ChatSource>, state, POLL_INTERVAL);

        tokio::time::sleep(Duration::from_secs(10)).await;
        poller.stop().await;
        let polled = source.0.load(Ordering::SeqCst);
        assert!(polled >= 2);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(source.0.load(Ordering::SeqCst), polled);
    }

    #[tokio::test(start_paused = true)]
    async fn logged_out_state_is_left_alone() {
        let state = AppState::default();
        let source = Arc::new(FixedChats(vec![chat(3, 7, "hello")]));
        let poller = ChatPoller::spawn(source, state.clone(), POLL_INTERVAL);

        tokio::time::sleep(Duration::from_secs(4)).await;
        poller.stop().await;

        assert!(state.snapshot().chats.is_empty());
    }
}
