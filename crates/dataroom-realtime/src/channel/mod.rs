//! Feed channel naming.

pub mod types;

pub use types::FeedChannel;
