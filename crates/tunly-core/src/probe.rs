// ── Latency probe ──
//
// One pass clears every latency, then asks the engine about each profile
// in list order, one call at a time. Results are published as they
// arrive so observers can render progress.

use serde::Serialize;
use tracing::{debug, warn};

use crate::backend::Engine;
use crate::catalog::Catalog;
use crate::model::{Latency, ProfileId};

/// Outcome for one profile in a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub id: ProfileId,
    pub latency: Latency,
    /// `false` if the profile was removed while being probed.
    pub recorded: bool,
}

/// All results of one pass, in probe order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub results: Vec<ProbeResult>,
}

impl ProbeReport {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Profiles that answered below the timeout sentinel.
    pub fn reachable(&self) -> impl Iterator<Item = &ProbeResult> {
        self.results
            .iter()
            .filter(|r| matches!(r.latency, Latency::Measured(_)))
    }

    /// Fastest reachable profile, if any.
    pub fn fastest(&self) -> Option<&ProbeResult> {
        self.reachable().min_by_key(|r| r.latency.millis())
    }
}

/// Run one probe pass over the profiles currently in `catalog`.
///
/// Engine errors count as a timeout at `sentinel_ms`; the pass never
/// aborts early. The profile list is captured once up front, so profiles
/// added mid-pass are not probed and removed ones are skipped on write.
pub(crate) async fn run<E: Engine>(engine: &E, catalog: &Catalog, sentinel_ms: u32) -> ProbeReport {
    let targets: Vec<ProfileId> = catalog
        .profiles_snapshot()
        .iter()
        .map(|entry| entry.id().clone())
        .collect();

    catalog.clear_latencies();
    debug!(count = targets.len(), "latency probe started");

    let mut report = ProbeReport {
        results: Vec::with_capacity(targets.len()),
    };
    for id in targets {
        let latency = match engine.probe_latency(&id).await {
            Ok(ms) => Latency::from_millis(ms, sentinel_ms),
            Err(e) => {
                warn!(profile = %id, error = %e, "latency probe failed");
                Latency::Timeout(sentinel_ms)
            }
        };
        let recorded = catalog.set_latency(&id, latency);
        if !recorded {
            debug!(profile = %id, "profile vanished during probe");
        }
        report.results.push(ProbeResult {
            id,
            latency,
            recorded,
        });
    }

    debug!(
        reachable = report.reachable().count(),
        total = report.len(),
        "latency probe finished"
    );
    report
}
