//! Multi-select state and drag-transfer payloads.

pub mod drag;
pub mod set;

pub use drag::DragPayload;
pub use set::Selection;
