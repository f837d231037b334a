//! Filesystem collaborators for directory creation.
//!
//! This module contains the pieces `mkdirp` is built from:
//!
//! - [`Mode`]: a POSIX permission-and-special-bit value, masked to 12 bits
//! - [`DirFs`]: the narrow filesystem surface the algorithm needs
//!   (create-directory, stat, read-link, change-mode), with [`TokioFs`] as the
//!   production implementation
//! - [`ensure_dir`] / [`ensure_dir_with`]: the recursive creation algorithm
//!   and its [`EnsureDirError`] taxonomy

pub mod dir_fs;
pub mod ensure_dir;
pub mod mode;

pub use dir_fs::{DirFs, DirMeta, TokioFs};
pub use ensure_dir::{EnsureDirError, ensure_dir, ensure_dir_with};
pub use mode::{MODE_MASK, Mode, ParseModeError};
