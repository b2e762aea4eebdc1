//! # tiledash-domain
//!
//! Pure domain model for the tiledash live dashboard.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **Fragments** (opaque markup pulled from a content endpoint)
//! - Define **Regions** (containers a poller writes fragments into) and the
//!   snapshot of what a region currently shows
//! - Define **poll scheduling values**: intervals, request sequence numbers,
//!   poller state, backoff policy
//! - Define **Sensor readings** (the data rendered as dashboard tiles)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod fragment;
pub mod poll;
pub mod reading;
pub mod region;
