//! The normalized workspace state.

pub mod snapshot;

pub use snapshot::Snapshot;
