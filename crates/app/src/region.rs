//! In-process target regions backed by a tokio [`watch`] channel.
//!
//! A [`LiveRegion`] always holds exactly one [`RegionSnapshot`]. Writers
//! replace it wholesale; readers either take a snapshot or subscribe to be
//! woken on every change (the SSE stream does the latter).

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use tiledash_domain::error::{NotFoundError, ValidationError};
use tiledash_domain::fragment::Fragment;
use tiledash_domain::poll::RequestSeq;
use tiledash_domain::region::{RegionContent, RegionId, RegionSnapshot, RegionStatus, Transition};

use crate::ports::TargetRegion;

/// A target region living in this process.
///
/// Publishing succeeds even when nobody is subscribed; the latest snapshot
/// is always retained.
pub struct LiveRegion {
    id: RegionId,
    sender: watch::Sender<RegionSnapshot>,
    /// Newest request whose outcome (fragment or failure report) was accepted.
    settled: Mutex<RequestSeq>,
}

impl LiveRegion {
    /// Create a region showing the loading indicator.
    #[must_use]
    pub fn new(id: RegionId) -> Self {
        let (sender, _) = watch::channel(RegionSnapshot::loading(id.clone()));
        Self {
            id,
            sender,
            settled: Mutex::new(RequestSeq::ZERO),
        }
    }

    /// Accept the outcome of request `seq` if nothing newer was accepted,
    /// publishing `update` while the settled sequence is still held.
    fn settle(&self, seq: RequestSeq, update: impl FnOnce(&mut RegionSnapshot) -> bool) -> bool {
        let mut settled = self.settled.lock().unwrap_or_else(PoisonError::into_inner);
        if seq <= *settled {
            return false;
        }
        *settled = seq;
        self.sender.send_if_modified(update);
        true
    }

    /// Current content and status.
    #[must_use]
    pub fn snapshot(&self) -> RegionSnapshot {
        self.sender.borrow().clone()
    }

    /// Subscribe to changes. The receiver starts at the current snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RegionSnapshot> {
        self.sender.subscribe()
    }
}

impl TargetRegion for LiveRegion {
    fn id(&self) -> &RegionId {
        &self.id
    }

    fn replace(&self, seq: RequestSeq, fragment: Fragment, transition: Transition) -> bool {
        self.settle(seq, |snapshot| {
            snapshot.content = RegionContent::Fragment {
                fragment,
                transition,
                applied_at: tiledash_domain::time::now(),
            };
            snapshot.seq = seq;
            snapshot.status = RegionStatus::Fresh;
            true
        })
    }

    fn report_failures(&self, seq: RequestSeq, consecutive_failures: u32) -> bool {
        let status = RegionStatus::Failing {
            consecutive_failures,
        };
        self.settle(seq, |snapshot| {
            if snapshot.status == status {
                return false;
            }
            snapshot.status = status;
            true
        })
    }
}

/// Ordered set of the regions a dashboard displays.
#[derive(Default)]
pub struct RegionRegistry {
    regions: Vec<Arc<LiveRegion>>,
}

impl RegionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new region (initially loading) and return it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateRegionId`] if `id` is taken.
    pub fn register(&mut self, id: RegionId) -> Result<Arc<LiveRegion>, ValidationError> {
        if self.get(id.as_str()).is_some() {
            return Err(ValidationError::DuplicateRegionId(id.to_string()));
        }
        let region = Arc::new(LiveRegion::new(id));
        self.regions.push(Arc::clone(&region));
        Ok(region)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<LiveRegion>> {
        self.regions.iter().find(|region| region.id().as_str() == id)
    }

    /// Look up a region, failing with [`NotFoundError`] if absent.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] when no region has this id.
    pub fn find(&self, id: &str) -> Result<Arc<LiveRegion>, NotFoundError> {
        self.get(id).map(Arc::clone).ok_or_else(|| NotFoundError {
            entity: "Region",
            id: id.to_string(),
        })
    }

    /// Snapshots of every region, in registration order.
    #[must_use]
    pub fn snapshots(&self) -> Vec<RegionSnapshot> {
        self.regions.iter().map(|region| region.snapshot()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
