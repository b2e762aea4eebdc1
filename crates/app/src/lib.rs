//! # tiledash-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement (driven/outbound ports):
//!   - `FragmentSource` — fetch the newest fragment from a content endpoint
//!   - `TargetRegion` — the container a poller writes fragments into
//!   - `ReadingStore` — record & query sensor readings
//! - Provide the **refresh poller**: a cancellable recurring task that keeps
//!   one region up to date with one source
//! - Provide **in-process infrastructure** that doesn't need IO: live regions
//!   backed by a tokio `watch` channel and a registry of them
//! - Provide the **readings service** (validate, record, prune)
//!
//! ## Dependency rule
//! Depends on `tiledash-domain` only (plus `tokio` for tasks, timers and
//! channels). Never imports adapter crates. Adapters depend on *this* crate,
//! not the reverse.

pub mod poller;
pub mod ports;
pub mod region;
pub mod services;
