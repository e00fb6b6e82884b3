//! Trigger registry

use std::sync::Arc;

use tokio::sync::Notify;
use tracing::debug;

use crate::domain::{TRIGGER_COUNT, TriggerId};

/// Maps each trigger id to the wake signals of the modules subscribed to it
///
/// Populated at startup with [`TriggerRouter::subscribe`], then shared
/// read-only. [`TriggerRouter::route`] only indexes a fixed table and
/// raises `Notify` permits, so it is safe to call from any context.
pub struct TriggerRouter {
    routes: Vec<Vec<Arc<Notify>>>,
}

impl TriggerRouter {
    pub fn new() -> Self {
        Self {
            routes: vec![Vec::new(); TRIGGER_COUNT],
        }
    }

    /// Create the wake signal for one module
    ///
    /// A module without a trigger still gets a signal; nothing routes to it.
    pub fn subscribe(&mut self, trigger: Option<TriggerId>) -> Arc<Notify> {
        debug!(?trigger, "TriggerRouter::subscribe: called");
        let wake = Arc::new(Notify::new());
        if let Some(id) = trigger {
            self.routes[id.index()].push(wake.clone());
        }
        wake
    }

    /// Wake every module subscribed to `id`
    ///
    /// Out-of-range ids are ignored. Returns the number of modules woken.
    pub fn route(&self, id: i64) -> usize {
        let Some(id) = TriggerId::new(id) else {
            return 0;
        };
        let subscribers = &self.routes[id.index()];
        for wake in subscribers {
            wake.notify_one();
        }
        subscribers.len()
    }

    /// Wake every subscribed module
    pub fn route_all(&self) -> usize {
        TriggerId::all().map(|id| self.route(i64::from(id.get()))).sum()
    }

    /// Number of modules subscribed to `id`
    pub fn subscribers(&self, id: TriggerId) -> usize {
        self.routes[id.index()].len()
    }

    /// Ids with at least one subscriber
    pub fn subscribed_ids(&self) -> impl Iterator<Item = TriggerId> + '_ {
        TriggerId::all().filter(|id| self.subscribers(*id) > 0)
    }
}

impl Default for TriggerRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn is_woken(wake: &Notify) -> bool {
        tokio::time::timeout(Duration::from_millis(50), wake.notified()).await.is_ok()
    }

    #[tokio::test]
    async fn test_route_wakes_only_matching_module() {
        let mut router = TriggerRouter::new();
        let net = router.subscribe(TriggerId::new(4));
        let mem = router.subscribe(TriggerId::new(2));

        assert_eq!(router.route(4), 1);
        assert!(is_woken(&net).await);
        assert!(!is_woken(&mem).await);
    }

    #[tokio::test]
    async fn test_shared_trigger_wakes_every_subscriber() {
        let mut router = TriggerRouter::new();
        let a = router.subscribe(TriggerId::new(7));
        let b = router.subscribe(TriggerId::new(7));

        assert_eq!(router.route(7), 2);
        assert!(is_woken(&a).await);
        assert!(is_woken(&b).await);
    }

    #[tokio::test]
    async fn test_out_of_range_ids_are_ignored() {
        let mut router = TriggerRouter::new();
        let wake = router.subscribe(TriggerId::new(0));

        assert_eq!(router.route(-1), 0);
        assert_eq!(router.route(31), 0);
        assert_eq!(router.route(i64::MIN), 0);
        assert!(!is_woken(&wake).await);
    }

    #[tokio::test]
    async fn test_unsubscribed_id_wakes_nothing() {
        let mut router = TriggerRouter::new();
        let untriggered = router.subscribe(None);

        assert_eq!(router.route(12), 0);
        assert_eq!(router.route_all(), 0);
        assert!(!is_woken(&untriggered).await);
    }

    #[test]
    fn test_subscribed_ids() {
        let mut router = TriggerRouter::new();
        router.subscribe(TriggerId::new(5));
        router.subscribe(TriggerId::new(1));
        router.subscribe(TriggerId::new(5));

        let ids: Vec<_> = router.subscribed_ids().map(TriggerId::get).collect();
        assert_eq!(ids, vec![1, 5]);
        assert_eq!(router.route_all(), 3);
    }
}
