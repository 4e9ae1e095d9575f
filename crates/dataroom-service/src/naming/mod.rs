//! Name normalization and collision avoidance.

pub mod resolver;

pub use resolver::{
    NamingPolicy, ensure_extension, has_required_extension, normalize_name, split_file_name,
    unique_file_name, unique_folder_name,
};
