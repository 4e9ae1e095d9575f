//! Room domain entities.

pub mod model;

pub use model::Room;
