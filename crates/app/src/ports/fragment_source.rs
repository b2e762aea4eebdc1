//! Fragment source port — where a poller pulls its markup from.

use std::future::Future;
use std::sync::Arc;

use tiledash_domain::error::FetchError;
use tiledash_domain::fragment::Fragment;

/// Produces the newest [`Fragment`] on demand.
///
/// Implementations must not retry internally: a failed fetch is reported as
/// a [`FetchError`] and the poller simply skips that tick.
pub trait FragmentSource: Send + Sync {
    /// Human-readable location of the source, used in logs.
    fn endpoint(&self) -> &str;

    /// Issue one request for the current fragment.
    fn fetch(&self) -> impl Future<Output = Result<Fragment, FetchError>> + Send;
}

impl<T: FragmentSource> FragmentSource for Arc<T> {
    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }

    fn fetch(&self) -> impl Future<Output = Result<Fragment, FetchError>> + Send {
        (**self).fetch()
    }
}
