//! Refresh poller — keeps one target region up to date with one fragment
//! source.
//!
//! [`RefreshPoller::start`] spawns a loop task that wakes every interval
//! (measured from the start, not from the previous fetch completing) and
//! dispatches a fetch in its own task, so a slow endpoint never delays the
//! schedule. Overlapping fetches are allowed; every tick carries a
//! [`RequestSeq`] and the region only accepts a fragment newer than the one
//! it shows, so the latest request always wins.
//!
//! Stopping cancels the schedule. Cancellation is checked while waiting,
//! right before each tick is dispatched and again before its fetch starts.
//! Fetches already started are not aborted, but whatever they return after
//! the stop is discarded.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use tiledash_domain::error::FetchError;
use tiledash_domain::fragment::Fragment;
use tiledash_domain::poll::{BackoffPolicy, PollInterval, PollerState, RequestSeq};
use tiledash_domain::region::{RegionId, Transition};

use crate::ports::{FragmentSource, TargetRegion};

/// Tunables of a single poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    pub interval: PollInterval,
    /// Effect applied each time a fragment replaces the region content.
    pub transition: Transition,
    pub backoff: BackoffPolicy,
    /// Consecutive failures after which the region is flagged as failing.
    /// Zero disables the flag.
    pub failure_threshold: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: PollInterval::default(),
            transition: Transition::default(),
            backoff: BackoffPolicy::Fixed,
            failure_threshold: 3,
        }
    }
}

/// Entry point for starting pollers.
pub struct RefreshPoller;

impl RefreshPoller {
    /// Start polling `source` into `region`. The first tick fires one
    /// interval from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<S, R>(config: PollerConfig, source: S, region: R) -> PollerHandle
    where
        S: FragmentSource + 'static,
        R: TargetRegion + 'static,
    {
        let cancel = CancellationToken::new();
        let region_id = region.id().clone();
        let shared = Arc::new(Shared {
            config,
            source,
            region,
            cancel: cancel.clone(),
            outcomes: Mutex::new(Outcomes::default()),
        });

        tracing::info!(
            region = %region_id,
            endpoint = shared.source.endpoint(),
            interval = ?config.interval.as_duration(),
            "refresh poller started"
        );

        let task = tokio::spawn(shared.run());

        PollerHandle {
            region: region_id,
            cancel,
            task: Some(task),
        }
    }
}

/// Owner of a running poller.
///
/// Dropping the handle cancels the schedule too, so a poller never outlives
/// whatever owns it.
#[derive(Debug)]
pub struct PollerHandle {
    region: RegionId,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Region this poller writes into.
    #[must_use]
    pub fn region(&self) -> &RegionId {
        &self.region
    }

    #[must_use]
    pub fn state(&self) -> PollerState {
        if self.task.is_some() && !self.cancel.is_cancelled() {
            PollerState::Polling
        } else {
            PollerState::Idle
        }
    }

    /// Cancel the schedule and wait for the loop to exit. Once this returns
    /// no further fetch is issued. Calling it again is a no-op.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        let Some(task) = self.task.take() else {
            return;
        };
        if let Err(err) = task.await {
            tracing::warn!(region = %self.region, %err, "refresh poller task ended abnormally");
        }
        tracing::info!(region = %self.region, "refresh poller stopped");
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Bookkeeping of settled fetches, used for the failure streak.
#[derive(Debug, Default)]
struct Outcomes {
    /// Newest sequence number whose outcome has been accounted for.
    latest: RequestSeq,
    consecutive_failures: u32,
}

impl Outcomes {
    /// Account for a success. Returns the failure streak it ended, or `None`
    /// if a newer request already settled.
    fn settle_success(&mut self, seq: RequestSeq) -> Option<u32> {
        if seq <= self.latest {
            return None;
        }
        self.latest = seq;
        Some(std::mem::take(&mut self.consecutive_failures))
    }

    /// Account for a failure. Returns the new streak length, or `None` if a
    /// newer request already settled.
    fn settle_failure(&mut self, seq: RequestSeq) -> Option<u32> {
        if seq <= self.latest {
            return None;
        }
        self.latest = seq;
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        Some(self.consecutive_failures)
    }
}

/// State shared between the loop task and the per-tick fetch tasks.
struct Shared<S, R> {
    config: PollerConfig,
    source: S,
    region: R,
    cancel: CancellationToken,
    outcomes: Mutex<Outcomes>,
}

impl<S, R> Shared<S, R>
where
    S: FragmentSource + 'static,
    R: TargetRegion + 'static,
{
    fn outcomes(&self) -> MutexGuard<'_, Outcomes> {
        self.outcomes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Gap between the previous tick and the next one.
    fn gap(&self) -> Duration {
        let failures = self.outcomes().consecutive_failures;
        self.config.backoff.delay(self.config.interval, failures)
    }

    async fn run(self: Arc<Self>) {
        let interval = self.config.interval.as_duration();
        let mut last_tick = Instant::now();
        let mut due = last_tick + interval;
        let mut seq = RequestSeq::ZERO;

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                () = tokio::time::sleep_until(due) => {}
            }

            // Backoff is decided on wake-up, once earlier ticks had a chance to settle.
            let required = last_tick + self.gap();
            if required > Instant::now() {
                due = required;
                continue;
            }
            if self.cancel.is_cancelled() {
                break;
            }

            seq = seq.next();
            tokio::spawn(Arc::clone(&self).tick(seq));

            last_tick = if Instant::now().duration_since(due) >= interval {
                // A whole period behind: realign instead of firing a burst.
                Instant::now()
            } else {
                due
            };
            due = last_tick + interval;
        }

        tracing::debug!(region = %self.region.id(), last_seq = %seq, "refresh poller loop exited");
    }

    async fn tick(self: Arc<Self>, seq: RequestSeq) {
        // Spawned ticks may only get polled after stop returned.
        if self.cancel.is_cancelled() {
            return;
        }

        let result = self.source.fetch().await;

        if self.cancel.is_cancelled() {
            tracing::debug!(region = %self.region.id(), %seq, "poller stopped, discarding response");
            return;
        }

        match result {
            Ok(fragment) => self.on_success(seq, fragment),
            Err(err) => self.on_failure(seq, &err),
        }
    }

    fn on_success(&self, seq: RequestSeq, fragment: Fragment) {
        let Some(ended_streak) = self.outcomes().settle_success(seq) else {
            tracing::debug!(region = %self.region.id(), %seq, "discarding out-of-order response");
            return;
        };
        if ended_streak > 0 {
            tracing::info!(
                region = %self.region.id(),
                endpoint = self.source.endpoint(),
                failures = ended_streak,
                "fragment source recovered"
            );
        }

        let bytes = fragment.len();
        if self.region.replace(seq, fragment, self.config.transition) {
            tracing::trace!(region = %self.region.id(), %seq, bytes, "region refreshed");
        } else {
            tracing::debug!(region = %self.region.id(), %seq, "region already shows a newer fragment");
        }
    }

    fn on_failure(&self, seq: RequestSeq, err: &FetchError) {
        let Some(failures) = self.outcomes().settle_failure(seq) else {
            return;
        };

        // Log a failure streak once; repeats only show up at debug level.
        if failures == 1 {
            tracing::warn!(
                region = %self.region.id(),
                endpoint = self.source.endpoint(),
                error = ?err,
                "fragment fetch failed, keeping current content"
            );
        } else {
            tracing::debug!(region = %self.region.id(), %seq, failures, error = %err, "fragment fetch failed again");
        }

        let threshold = self.config.failure_threshold;
        if threshold > 0
            && failures >= threshold
            && !self.region.report_failures(seq, failures)
        {
            tracing::debug!(region = %self.region.id(), %seq, "region already shows a newer outcome");
        }
    }
}
