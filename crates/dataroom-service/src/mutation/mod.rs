//! The mutation engine: validated, copy-on-write snapshot transitions.
//!
//! Every operation borrows the current snapshot immutably and either
//! returns a complete new snapshot or an error. A failed call therefore
//! cannot leave a partial write behind.

pub mod bulk;
pub mod engine;
pub mod file;
pub mod folder;
pub mod movement;
pub mod outcome;
pub mod room;

pub use engine::MutationEngine;
pub use outcome::{Applied, DeleteOutcome, FileUpload, MoveOutcome, RoomCreated, UploadOutcome};
