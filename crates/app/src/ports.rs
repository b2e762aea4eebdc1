//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod fragment_source;
pub mod reading_store;
pub mod target_region;

pub use fragment_source::FragmentSource;
pub use reading_store::ReadingStore;
pub use target_region::TargetRegion;
