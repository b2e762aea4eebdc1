//! Target region port — the container a poller writes fragments into.

use std::sync::Arc;

use tiledash_domain::fragment::Fragment;
use tiledash_domain::poll::RequestSeq;
use tiledash_domain::region::{RegionId, Transition};

/// A region whose content is replaced wholesale by a poller.
pub trait TargetRegion: Send + Sync {
    fn id(&self) -> &RegionId;

    /// Replace the content with `fragment`, applying `transition`.
    ///
    /// Must apply only when `seq` is strictly greater than the sequence
    /// number of every fragment or failure report accepted so far, so a slow
    /// response can never overwrite a newer outcome. Returns whether the
    /// fragment was applied. A successful replacement also clears any
    /// failure status.
    fn replace(&self, seq: RequestSeq, fragment: Fragment, transition: Transition) -> bool;

    /// Flag that the source has failed `consecutive_failures` times in a row,
    /// the last time for request `seq`. Ignored when a newer outcome was
    /// already accepted. The content itself stays untouched.
    fn report_failures(&self, seq: RequestSeq, consecutive_failures: u32) -> bool;
}

impl<T: TargetRegion> TargetRegion for Arc<T> {
    fn id(&self) -> &RegionId {
        (**self).id()
    }

    fn replace(&self, seq: RequestSeq, fragment: Fragment, transition: Transition) -> bool {
        (**self).replace(seq, fragment, transition)
    }

    fn report_failures(&self, seq: RequestSeq, consecutive_failures: u32) -> bool {
        (**self).report_failures(seq, consecutive_failures)
    }
}
