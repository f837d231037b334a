//! Filesystem collaborator trait.
//!
//! [`DirFs`] is the narrow surface the recursive creation algorithm needs:
//! create-directory, stat (following symlinks), read-link, and change-mode.
//! All methods return `std::io::Result` so callers can branch on
//! [`std::io::ErrorKind`] (`NotFound`, `AlreadyExists`, other) instead of
//! string-matching platform error codes.
//!
//! [`TokioFs`] is the production implementation over `tokio::fs`. Tests swap
//! in counting or fault-injecting implementations.

use std::io;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::mode::Mode;

/// The metadata subset directory reconciliation looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirMeta {
  /// Whether the entry (after following symlinks) is a directory.
  pub is_dir: bool,
  /// The entry's permission bits, masked to the low 12 bits.
  pub mode: Mode,
}

/// The filesystem operations required to ensure a directory exists.
#[async_trait]
pub trait DirFs: Send + Sync {
  /// Creates a single directory at `path`.
  ///
  /// When `mode` is `None` the filesystem's default directory-creation mode
  /// applies (subject to the process umask). Must fail with
  /// `ErrorKind::NotFound` when the parent chain is missing and
  /// `ErrorKind::AlreadyExists` when something is already at `path`.
  async fn create_dir(&self, path: &Path, mode: Option<Mode>) -> io::Result<()>;

  /// Stats `path`, following symlinks.
  async fn stat(&self, path: &Path) -> io::Result<DirMeta>;

  /// Reads the target of the symlink at `path`.
  async fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

  /// Changes the permission bits of the entry at `path` (following symlinks).
  async fn set_mode(&self, path: &Path, mode: Mode) -> io::Result<()>;
}

/// Production [`DirFs`] implementation backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFs;

#[async_trait]
impl DirFs for TokioFs {
  async fn create_dir(&self, path: &Path, mode: Option<Mode>) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    if let Some(mode) = mode {
      builder.mode(mode.bits());
    }
    builder.create(path).await
  }

  async fn stat(&self, path: &Path) -> io::Result<DirMeta> {
    let metadata = fs::metadata(path).await?;
    Ok(DirMeta {
      is_dir: metadata.is_dir(),
      mode: Mode::new(metadata.mode()),
    })
  }

  async fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
    fs::read_link(path).await
  }

  async fn set_mode(&self, path: &Path, mode: Mode) -> io::Result<()> {
    fs::set_permissions(path, std::fs::Permissions::from_mode(mode.bits())).await
  }
}
