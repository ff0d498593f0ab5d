// ── Event bridge ──
//
// One bounded channel per push event name, drained by a single dispatch
// loop that applies each decoded event to the orchestrator. Every payload
// is stamped from one counter as it is enqueued, and the loop always takes
// the lowest stamp across channels, so events apply in arrival order no
// matter which channel carried them. The loop runs until cancelled or
// until every sink is dropped.

mod event;
mod log_buffer;

use std::collections::HashMap;
use std::future::poll_fn;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use strum::IntoEnumIterator;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::backend::{Engine, Store};
use crate::orchestrator::Orchestrator;

pub use event::{EngineEvent, EventKind};
pub use log_buffer::{LogBuffer, strip_ansi};

/// Create a connected sink / bridge pair for `orchestrator`.
///
/// Each channel holds `config().event_channel_capacity` payloads.
pub fn channel<E: Engine, S: Store>(
    orchestrator: Orchestrator<E, S>,
) -> (EventSink, EventBridge<E, S>) {
    let capacity = orchestrator.config().event_channel_capacity.max(1);

    let mut senders = HashMap::new();
    let mut lanes = Vec::new();
    for kind in EventKind::iter() {
        let (tx, rx) = mpsc::channel(capacity);
        senders.insert(kind, tx);
        lanes.push(Lane::new(kind, rx));
    }

    let sink = EventSink {
        shared: Arc::new(SinkShared {
            senders,
            next_seq: AtomicU64::new(0),
        }),
    };
    let bridge = EventBridge {
        orchestrator,
        lanes,
    };
    (sink, bridge)
}

/// A payload with its position in the overall arrival order.
#[derive(Debug)]
struct Stamped {
    seq: u64,
    payload: String,
}

// ── EventSink ────────────────────────────────────────────────────

struct SinkShared {
    senders: HashMap<EventKind, mpsc::Sender<Stamped>>,
    next_seq: AtomicU64,
}

/// Producer side: the engine adapter pushes raw events through this.
#[derive(Clone)]
pub struct EventSink {
    shared: Arc<SinkShared>,
}

impl EventSink {
    /// Route `payload` to the channel called `name`, waiting for room.
    ///
    /// Unknown names are dropped with a warning. Returns whether the
    /// payload was queued.
    pub async fn emit(&self, name: &str, payload: impl Into<String>) -> bool {
        let Some(tx) = self.route(name) else {
            return false;
        };
        // Stamp only once a slot is held, so a producer parked on a full
        // channel doesn't claim a place ahead of events queued meanwhile.
        let Ok(permit) = tx.reserve().await else {
            debug!(event = name, "event bridge stopped, dropping event");
            return false;
        };
        permit.send(self.stamp(payload.into()));
        true
    }

    /// Non-waiting variant for synchronous callbacks. A full channel drops
    /// the payload.
    pub fn try_emit(&self, name: &str, payload: impl Into<String>) -> bool {
        let Some(tx) = self.route(name) else {
            return false;
        };
        match tx.try_reserve() {
            Ok(permit) => {
                permit.send(self.stamp(payload.into()));
                true
            }
            Err(TrySendError::Full(())) => {
                warn!(event = name, "event channel full, dropping event");
                false
            }
            Err(TrySendError::Closed(())) => {
                debug!(event = name, "event bridge stopped, dropping event");
                false
            }
        }
    }

    fn stamp(&self, payload: String) -> Stamped {
        Stamped {
            seq: self.shared.next_seq.fetch_add(1, Ordering::Relaxed),
            payload,
        }
    }

    fn route(&self, name: &str) -> Option<&mpsc::Sender<Stamped>> {
        let Ok(kind) = name.parse::<EventKind>() else {
            warn!(event = name, "ignoring unknown push event");
            return None;
        };
        self.shared.senders.get(&kind)
    }
}

// ── EventBridge ──────────────────────────────────────────────────

/// One event channel as seen by the dispatch loop, with at most one
/// payload pulled off it and waiting its turn.
struct Lane {
    kind: EventKind,
    rx: mpsc::Receiver<Stamped>,
    head: Option<Stamped>,
    open: bool,
}

impl Lane {
    fn new(kind: EventKind, rx: mpsc::Receiver<Stamped>) -> Self {
        Self {
            kind,
            rx,
            head: None,
            open: true,
        }
    }

    fn fill(&mut self) {
        if self.head.is_some() || !self.open {
            return;
        }
        match self.rx.try_recv() {
            Ok(stamped) => self.head = Some(stamped),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => self.open = false,
        }
    }
}

/// Wake once any idle lane receives a payload or closes.
fn poll_arrival(lanes: &mut [Lane], cx: &mut Context<'_>) -> Poll<()> {
    let mut woke = false;
    for lane in lanes.iter_mut().filter(|l| l.open && l.head.is_none()) {
        match lane.rx.poll_recv(cx) {
            Poll::Ready(Some(stamped)) => {
                lane.head = Some(stamped);
                woke = true;
            }
            Poll::Ready(None) => {
                lane.open = false;
                woke = true;
            }
            Poll::Pending => {}
        }
    }
    if woke { Poll::Ready(()) } else { Poll::Pending }
}

/// Consumer side: the single dispatch loop.
pub struct EventBridge<E: Engine, S: Store> {
    orchestrator: Orchestrator<E, S>,
    lanes: Vec<Lane>,
}

impl<E: Engine, S: Store> EventBridge<E, S> {
    /// Apply events in arrival order until `cancel` fires or all sinks
    /// are gone. Whatever is still queued when the sinks drop is applied
    /// before returning.
    pub async fn run(mut self, cancel: CancellationToken) {
        debug!("event bridge started");
        loop {
            if cancel.is_cancelled() {
                break;
            }
            for lane in &mut self.lanes {
                lane.fill();
            }

            let oldest = self
                .lanes
                .iter_mut()
                .filter(|lane| lane.head.is_some())
                .min_by_key(|lane| lane.head.as_ref().map_or(u64::MAX, |s| s.seq));
            if let Some(lane) = oldest {
                let kind = lane.kind;
                if let Some(stamped) = lane.head.take() {
                    self.dispatch(kind, stamped);
                }
                continue;
            }

            if self.lanes.iter().all(|lane| !lane.open) {
                break;
            }
            let lanes = &mut self.lanes;
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = poll_fn(|cx| poll_arrival(lanes, cx)) => {}
            }
        }
        debug!("event bridge stopped");
    }

    fn dispatch(&self, kind: EventKind, stamped: Stamped) {
        trace!(event = %kind, seq = stamped.seq, "dispatching push event");
        if let Some(event) = EngineEvent::decode(kind, stamped.payload) {
            self.orchestrator.apply_event(event);
        }
    }
}
