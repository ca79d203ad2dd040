use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use giftscan_core::{AggregateStats, ExtractedRecord, Identifier};
use giftscan_logging::{scan_debug, scan_error, scan_info, scan_warn};
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::fetch::{Fetcher, ProgressSink};
use crate::{FailureKind, FetchError, ScanEvent};

/// Fetches allowed in flight when the caller does not choose a limit.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Inclusive range of identifiers to scan. `end < start` is an empty range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRange {
    pub start: Identifier,
    pub end: Identifier,
}

impl ScanRange {
    pub fn new(start: Identifier, end: Identifier) -> Self {
        Self { start, end }
    }

    /// `count` identifiers starting at 1.
    pub fn from_count(count: u64) -> Self {
        Self::starting_at(1, count)
    }

    /// `count` identifiers starting at `start`.
    pub fn starting_at(start: Identifier, count: u64) -> Self {
        match count.checked_sub(1) {
            Some(last) => Self::new(start, start.saturating_add(last)),
            None => Self::new(1, 0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn iter(&self) -> RangeInclusive<Identifier> {
        self.start..=self.end
    }
}

/// Upper bound on simultaneous fetches; never below one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrencyLimit(usize);

impl ConcurrencyLimit {
    pub fn new(requested: usize) -> Self {
        if requested == 0 {
            scan_warn!("concurrency limit 0 raised to 1");
            return Self(1);
        }
        Self(requested.min(Semaphore::MAX_PERMITS))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for ConcurrencyLimit {
    fn default() -> Self {
        Self(DEFAULT_CONCURRENCY)
    }
}

/// Runs a [`Fetcher`] over a range of identifiers with bounded parallelism.
///
/// Each identifier runs as its own task once it holds a permit. The scan
/// future is the only owner of the [`AggregateStats`]: finished tasks are
/// drained one at a time, merged, and reported to the [`ProgressSink`].
pub struct ScanEngine {
    fetcher: Arc<dyn Fetcher>,
    limit: ConcurrencyLimit,
}

impl ScanEngine {
    pub fn new(fetcher: Arc<dyn Fetcher>, limit: ConcurrencyLimit) -> Self {
        Self { fetcher, limit }
    }

    pub fn concurrency_limit(&self) -> ConcurrencyLimit {
        self.limit
    }

    pub async fn scan(&self, range: ScanRange, sink: &dyn ProgressSink) -> AggregateStats {
        self.scan_with_cancel(range, sink, &CancellationToken::new())
            .await
    }

    /// Like [`ScanEngine::scan`], but stops admitting identifiers once `cancel`
    /// fires. Identifiers already admitted still finish and are merged.
    pub async fn scan_with_cancel(
        &self,
        range: ScanRange,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> AggregateStats {
        let mut stats = AggregateStats::new();
        if range.is_empty() {
            return stats;
        }
        scan_info!(
            "scan started: identifiers {}..={} limit={}",
            range.start,
            range.end,
            self.limit.get()
        );

        let permits = Arc::new(Semaphore::new(self.limit.get()));
        let mut pending = range.iter();
        let mut next = pending.next();
        let mut units: JoinSet<(Identifier, Result<ExtractedRecord, FetchError>)> =
            JoinSet::new();
        let mut owners: HashMap<Id, Identifier> = HashMap::new();

        loop {
            tokio::select! {
                biased;

                Some(joined) = units.join_next_with_id() => {
                    collect(&mut stats, sink, &mut owners, joined);
                }
                _ = cancel.cancelled(), if next.is_some() => {
                    scan_warn!("scan cancelled before identifier {:?}", next);
                    next = None;
                }
                permit = Arc::clone(&permits).acquire_owned(), if next.is_some() => {
                    let (Ok(permit), Some(identifier)) = (permit, next) else {
                        next = None;
                        continue;
                    };
                    let fetcher = Arc::clone(&self.fetcher);
                    let handle = units.spawn(async move {
                        let result = AssertUnwindSafe(fetcher.fetch(identifier))
                            .catch_unwind()
                            .await
                            .unwrap_or_else(|_| {
                                Err(FetchError::new(FailureKind::Panicked, "fetch task panicked"))
                            });
                        drop(permit);
                        (identifier, result)
                    });
                    owners.insert(handle.id(), identifier);
                    next = pending.next();
                }
                else => break,
            }
        }

        scan_info!(
            "scan finished: processed={} failed={}",
            stats.total_processed(),
            stats.failures().total()
        );
        stats
    }
}

type Joined = Result<(Id, (Identifier, Result<ExtractedRecord, FetchError>)), JoinError>;

/// Settles one finished unit. A unit whose task was aborted is settled as a
/// failure for the identifier it was spawned with.
fn collect(
    stats: &mut AggregateStats,
    sink: &dyn ProgressSink,
    owners: &mut HashMap<Id, Identifier>,
    joined: Joined,
) {
    match joined {
        Ok((id, (identifier, result))) => {
            owners.remove(&id);
            settle(stats, sink, identifier, result);
        }
        Err(err) => {
            let Some(identifier) = owners.remove(&err.id()) else {
                scan_error!("unknown scan unit did not complete: {}", err);
                return;
            };
            scan_error!("scan unit for identifier {} did not complete: {}", identifier, err);
            let kind = if err.is_panic() {
                FailureKind::Panicked
            } else {
                FailureKind::Cancelled
            };
            let message = err.to_string();
            settle(stats, sink, identifier, Err(FetchError::new(kind, message)));
        }
    }
}

fn settle(
    stats: &mut AggregateStats,
    sink: &dyn ProgressSink,
    identifier: Identifier,
    result: Result<ExtractedRecord, FetchError>,
) {
    let result = match result {
        Ok(record) => {
            stats.merge(record.clone());
            Ok(record)
        }
        Err(err) => {
            scan_debug!("identifier {} not counted: {}", identifier, err);
            stats.record_failure(err.kind.category());
            Err(err.kind)
        }
    };
    sink.emit(ScanEvent { identifier, result });
}
