//! Cross-platform utilities and helpers
//!
//! # Modules
//!
//! - [`fs`] - File system operations with atomic writes and lexical path handling
//! - [`platform`] - Platform-specific helpers

pub mod fs;
pub mod platform;

pub use fs::{
    atomic_write, ensure_dir, normalize_path, read_json_file, read_text_file, relative_to_root,
    to_posix, write_json_file, write_yaml_file,
};
pub use platform::{get_git_command, is_windows};
