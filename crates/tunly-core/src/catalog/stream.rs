// ── Catalog subscriptions ──
//
// Hosts hold an `EntityStream` to render a list and react to refreshes
// and probe progress without polling the catalog.

use std::sync::Arc;

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::StreamExt as _;
use tokio_stream::wrappers::WatchStream;

use crate::model::{Latency, ProfileEntry, ProfileId};

/// One immutable view of a collection.
pub type Snapshot<T> = Arc<Vec<Arc<T>>>;

/// A live view of one catalog collection.
pub struct EntityStream<T: Send + Sync + 'static> {
    current: Snapshot<T>,
    receiver: watch::Receiver<Snapshot<T>>,
}

impl<T: Send + Sync + 'static> EntityStream<T> {
    pub(crate) fn new(mut receiver: watch::Receiver<Snapshot<T>>) -> Self {
        let current = Arc::clone(&receiver.borrow_and_update());
        Self { current, receiver }
    }

    /// The snapshot seen at creation or at the last [`changed`](Self::changed).
    pub fn current(&self) -> &Snapshot<T> {
        &self.current
    }

    /// Wait for the next mutation. `None` once the catalog is gone.
    pub async fn changed(&mut self) -> Option<Snapshot<T>> {
        self.receiver.changed().await.ok()?;
        self.current = Arc::clone(&self.receiver.borrow_and_update());
        Some(Arc::clone(&self.current))
    }

    /// Yield the latest snapshot now and after every mutation. Bursts of
    /// mutations between polls collapse into one item.
    pub fn into_stream(self) -> impl Stream<Item = Snapshot<T>> + Send + Unpin {
        WatchStream::new(self.receiver)
    }
}

impl EntityStream<ProfileEntry> {
    /// Per-profile latency in list order, re-emitted whenever a probe
    /// result lands or the list is refreshed.
    pub fn into_latencies(self) -> impl Stream<Item = Vec<(ProfileId, Latency)>> + Send + Unpin {
        self.into_stream().map(|snapshot| {
            snapshot
                .iter()
                .map(|entry| (entry.id().clone(), entry.latency))
                .collect()
        })
    }
}
