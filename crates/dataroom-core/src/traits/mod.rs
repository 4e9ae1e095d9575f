//! Store traits defined in `dataroom-core` and implemented by other crates.

pub mod content;
pub mod remote;

pub use content::ContentCache;
pub use remote::RemoteStore;
