//! Change notifications.
//!
//! Mutators publish onto a broadcast channel and any view subscribes.  This
//! replaces interval polling for cross-view updates: a view re-reads the
//! store when an event arrives instead of on a timer that can race its own
//! teardown.

use tokio::sync::broadcast;

/// What changed.  Coarse-grained on purpose: receivers re-read state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    MatchesChanged,
    InterestsChanged,
    ConversationsChanged,
    ThreadUpdated { peer: String },
}

const BUS_CAPACITY: usize = 64;

/// Broadcast bus connecting mutators to views.
#[derive(Debug, Clone)]
pub struct ChangeBus {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: ChangeEvent) {
        // No receivers is normal (e.g. headless tests); nothing to do.
        if let Err(e) = self.tx.send(event) {
            tracing::trace!(error = %e, "change event dropped, no subscribers");
        }
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_see_published_events() {
        let bus = ChangeBus::new();
        let mut rx = bus.subscribe();

        bus.publish(ChangeEvent::MatchesChanged);
        bus.publish(ChangeEvent::ThreadUpdated { peer: "ana".into() });

        assert_eq!(rx.recv().await.unwrap(), ChangeEvent::MatchesChanged);
        assert_eq!(
            rx.recv().await.unwrap(),
            ChangeEvent::ThreadUpdated { peer: "ana".into() }
        );
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let bus = ChangeBus::new();
        bus.publish(ChangeEvent::InterestsChanged);
    }
}
