//! URL-validity pruning.
//!
//! Two stages, both order-preserving:
//! 1. Format checks (see [`format`]) on every item, no I/O.
//! 2. Optional reachability probes, run in batches of at most `batch_size`
//!    concurrent requests; each batch completes before the next starts.
//!
//! A failing item is dropped and counted by reason; it never aborts the run.

pub mod format;
pub mod reachability;
pub mod reason;

use std::collections::BTreeMap;

use futures_util::future::join_all;

pub use format::check_format;
pub use reachability::{MAX_REDIRECT_DEPTH, ReachabilityChecker, UrlProbe};
pub use reason::{PruneReason, PrunedUrl};

/// Rejected URLs retained for the summary, per pruning pass.
pub const MAX_SAMPLES: usize = 20;

/// Counters for one pruning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruningStats {
    pub checked: usize,
    pub kept: usize,
    /// Rejections keyed by [`PruneReason::as_str`].
    pub by_reason: BTreeMap<&'static str, usize>,
    /// Rejections for which [`PruneReason::is_transient`] holds.
    pub transient: usize,
    /// First rejected URLs, capped at [`MAX_SAMPLES`].
    pub samples: Vec<PrunedUrl>,
}

impl PruningStats {
    pub fn pruned(&self) -> usize {
        self.checked - self.kept
    }

    fn reject(&mut self, url: Option<String>, reason: PruneReason) {
        tracing::debug!(url = url.as_deref().unwrap_or("<none>"), reason = %reason, "pruned URL");
        *self.by_reason.entry(reason.as_str()).or_default() += 1;
        if reason.is_transient() {
            self.transient += 1;
        }
        if self.samples.len() < MAX_SAMPLES {
            self.samples.push(PrunedUrl { url: url.unwrap_or_default(), reason });
        }
    }

    /// Fold another pass into this one.
    pub fn absorb(&mut self, other: PruningStats) {
        self.checked += other.checked;
        self.kept += other.kept;
        self.transient += other.transient;
        for (reason, count) in other.by_reason {
            *self.by_reason.entry(reason).or_default() += count;
        }
        let room = MAX_SAMPLES.saturating_sub(self.samples.len());
        self.samples.extend(other.samples.into_iter().take(room));
    }
}

/// Survivors of a pruning pass plus its counters.
#[derive(Debug)]
pub struct PruneOutcome<T> {
    pub kept: Vec<T>,
    pub stats: PruningStats,
}

/// Prune `items` by the URL `url_of` yields for each.
///
/// With `probe` set, format-valid URLs are probed in batches of
/// `batch_size`. Survivors keep their input order.
pub async fn prune<T, F>(items: Vec<T>, url_of: F, probe: Option<&dyn UrlProbe>, batch_size: usize) -> PruneOutcome<T>
where
    F: Fn(&T) -> Option<String>,
{
    let mut stats = PruningStats { checked: items.len(), ..Default::default() };

    let mut candidates = Vec::with_capacity(items.len());
    for item in items {
        let url = url_of(&item);
        match check_format(url.as_deref()) {
            Ok(_) => candidates.push((item, url.unwrap_or_default())),
            Err(reason) => stats.reject(url, reason),
        }
    }

    let kept = match probe {
        None => candidates.into_iter().map(|(item, _)| item).collect(),
        Some(probe) => {
            let mut verdicts = Vec::with_capacity(candidates.len());
            for batch in candidates.chunks(batch_size.max(1)) {
                verdicts.extend(join_all(batch.iter().map(|(_, url)| probe.probe(url))).await);
            }

            let mut kept = Vec::with_capacity(candidates.len());
            for ((item, url), verdict) in candidates.into_iter().zip(verdicts) {
                match verdict {
                    Ok(()) => kept.push(item),
                    Err(reason) => stats.reject(Some(url), reason),
                }
            }
            kept
        }
    };

    stats.kept = kept.len();
    PruneOutcome { kept, stats }
}
