//! # tiledash-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **dashboard shell**: one container per target region holding
//!   its live fragment, or a spinner until the first fragment arrives
//! - Serve the **tile endpoint** (`/tiles`) the default poller fetches
//! - Serve a small **JSON API** (`/api/regions`, `/api/readings`) and an
//!   **SSE stream** of region snapshots
//!
//! ## No-JS dashboard approach
//! - The shell is rendered server-side as complete HTML.
//! - `<meta http-equiv="refresh">` reloads it at a configurable interval.
//! - The fade-in on replacement is a CSS animation, emitted only while the
//!   fragment is newer than one refresh period.
//!
//! ## Dependency rule
//! Depends on `tiledash-app` (ports, services, regions) and `tiledash-domain`
//! (types used in request/response mapping). Never leaks axum types into the
//! domain.

pub mod api;
pub mod dashboard;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod test_support;
