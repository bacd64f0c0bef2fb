//! Filesystem module.
//!
//! Provides:
//! - Local directory preparation and collision checks
//! - Remote name validation

pub mod naming;
pub mod paths;

pub use naming::{join_remote_path, validate_node_name};
pub use paths::{
    create_target_file, entry_exists, is_plain_dir, prepare_dir, resolve_file_target, DirState,
};
