use super::StoryProgress;
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex, PoisonError,
};
use tokio::sync::mpsc as tokio_mpsc;
use tracing::debug;

type SubscriptionId = u64;

struct Subscription {
    tx: tokio_mpsc::UnboundedSender<StoryProgress>,
}

type Subscriptions = Arc<Mutex<HashMap<SubscriptionId, Subscription>>>;

/// Handle for subscribing to story progress updates
#[derive(Clone)]
pub struct StoryProgressHandle {
    subscriptions: Subscriptions,
    next_id: Arc<AtomicU64>,
    closed: Arc<AtomicBool>,
}

impl StoryProgressHandle {
    /// Create a new progress handle and spawn background task to fan updates out
    pub fn new(
        mut progress_rx: tokio_mpsc::UnboundedReceiver<StoryProgress>,
        runtime_handle: &tokio::runtime::Handle,
    ) -> Self {
        let subscriptions: Subscriptions = Arc::new(Mutex::new(HashMap::new()));
        let subscriptions_clone = subscriptions.clone();
        let closed = Arc::new(AtomicBool::new(false));
        let closed_clone = closed.clone();

        runtime_handle.spawn(async move {
            while let Some(progress) = progress_rx.recv().await {
                let mut subs = subscriptions_clone
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);

                // A failed send means the receiver was dropped
                subs.retain(|_, subscription| subscription.tx.send(progress.clone()).is_ok());
            }
            debug!("Story progress channel closed, exiting");

            // Dropping the senders ends every subscriber's stream
            let mut subs = subscriptions_clone
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            closed_clone.store(true, Ordering::SeqCst);
            subs.clear();
        });

        Self {
            subscriptions,
            next_id: Arc::new(AtomicU64::new(1)),
            closed,
        }
    }

    /// Subscribe to all story progress updates.
    ///
    /// The subscription is removed once the receiver is dropped. Subscribing
    /// after the session ended yields a receiver that is already closed.
    pub fn subscribe_all(&self) -> tokio_mpsc::UnboundedReceiver<StoryProgress> {
        let (tx, rx) = tokio_mpsc::unbounded_channel();
        let mut subs = self
            .subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.closed.load(Ordering::SeqCst) {
            return rx;
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        subs.insert(id, Subscription { tx });
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
