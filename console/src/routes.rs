// Route transition fan-out

use common::models::RouteState;
use tokio::sync::broadcast;

/// Broadcast hub for successful route transitions.
///
/// `announce` is called by whoever drives navigation; every subscriber
/// receives the destination snapshot. Subscribers attached after a
/// transition do not replay it — recomputation on attach is driven by the
/// app-state streams, which do replay.
#[derive(Debug, Clone)]
pub struct TransitionHub {
    tx: broadcast::Sender<RouteState>,
}

impl Default for TransitionHub {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Fired on every successful state change.
    pub fn announce(&self, route: RouteState) {
        // No subscribers is fine
        let _ = self.tx.send(route);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RouteState> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_announced_transitions() {
        let hub = TransitionHub::new();
        let mut rx = hub.subscribe();

        hub.announce(RouteState::new("home", Some("Home")));

        let route = rx.recv().await.expect("no transition received");
        assert_eq!(route.name, "home");
        assert_eq!(route.page_title.as_deref(), Some("Home"));
    }

    #[tokio::test]
    async fn announce_without_subscribers_is_a_noop() {
        let hub = TransitionHub::new();
        hub.announce(RouteState::new("status", None));
    }
}
