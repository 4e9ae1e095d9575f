//! # dataroom-service
//!
//! Workspace logic for the data room. The pieces build on each other:
//!
//! - [`hierarchy`]: read-only traversal and derived views over a snapshot
//! - [`naming`]: deterministic collision avoidance for names
//! - [`mutation`]: the pure engine, the sole write path for snapshots
//! - [`selection`]: multi-select sets and drag payloads
//! - [`sync`]: the coordinator reconciling local edits, remote feeds and
//!   the content cache
//!
//! The engine is synchronous and side-effect free; everything that talks
//! to a store lives in [`sync`].

pub mod hierarchy;
pub mod mutation;
pub mod naming;
pub mod selection;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

pub use hierarchy::Hierarchy;
pub use mutation::{Applied, MutationEngine};
pub use naming::NamingPolicy;
pub use selection::{DragPayload, Selection};
pub use sync::SyncCoordinator;
