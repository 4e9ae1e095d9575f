//! # dataroom-entity
//!
//! Domain entity models for the data room workspace. Rooms, folders and
//! file records reference each other only through typed ids; the
//! [`Snapshot`](workspace::Snapshot) arena owns every entity.

pub mod file;
pub mod folder;
pub mod preference;
pub mod room;
pub mod workspace;

pub use file::{FileOrigin, FileRecord};
pub use folder::{Folder, FolderNode};
pub use preference::Preferences;
pub use room::Room;
pub use workspace::Snapshot;
