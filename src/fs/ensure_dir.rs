//! Recursive, mode-aware directory creation.
//!
//! [`ensure_dir`] guarantees a directory path exists, creating missing parents
//! on demand and reconciling an optionally requested [`Mode`] with whatever is
//! already on disk.
//!
//! # Algorithm
//!
//! The algorithm tries the create first and only walks toward the root when
//! that fails with `NotFound`. On the common cold path (a fresh deep path)
//! this costs one create per level instead of a stat per level followed by
//! creates:
//!
//! 1. create the directory;
//! 2. on success, stat it to learn the *actual* resulting mode (umask may
//!    have stripped bits) and issue a change-mode call only when the masked
//!    on-disk mode differs from the requested one;
//! 3. on `NotFound`, ensure the parent first (with *no* mode - intermediate
//!    directories always get the default creation mode) and then re-run the
//!    whole ensure for the original path;
//! 4. on `AlreadyExists`, stat through symlinks and reconcile: a directory is
//!    reconciled exactly as in step 2, anything else is a conflict;
//! 5. any other error propagates immediately.
//!
//! Each parent recursion strictly shortens the path toward the root, so the
//! built-in retry is bounded. Concurrent callers racing on the same missing
//! path are not coordinated; the loser of the create race simply takes the
//! `AlreadyExists` branch and reconciles mode.
//!
//! # Symlinks
//!
//! A symlink to a directory satisfies the contract and a requested mode is
//! applied to the target. A dangling symlink fails with
//! [`EnsureDirError::MissingTarget`] naming the link *target*, and a symlink
//! to a non-directory fails with [`EnsureDirError::Conflict`] naming the
//! target, so callers can diagnose which path is actually broken.

use std::io;
use std::path::{Path, PathBuf};

use futures::future::BoxFuture;
use thiserror::Error;
use tracing::debug;

use super::dir_fs::{DirFs, TokioFs};
use super::mode::Mode;

/// Error returned by [`ensure_dir`] and [`ensure_dir_with`].
///
/// Every variant is terminal for the current call; recursion-internal errors
/// are not wrapped or translated, they propagate from the level that produced
/// them with their original path and error code.
#[derive(Debug, Error)]
pub enum EnsureDirError {
  /// Something exists at the path and it is not a directory.
  ///
  /// For a symlink the path is the resolved link target. The source is the
  /// original creation error, which carries the conflicting-entity
  /// semantics; the stat that discovered the entity only confirmed it.
  #[error("path exists and is not a directory: {}", path.display())]
  Conflict {
    /// The conflicting path.
    path: PathBuf,
    /// The creation error that reported the conflict.
    #[source]
    source: io::Error,
  },

  /// The path is a symlink whose target does not exist.
  #[error("symlink target does not exist: {}", target.display())]
  MissingTarget {
    /// The unresolved link target.
    target: PathBuf,
    /// The not-found error produced by following the link.
    #[source]
    source: io::Error,
  },

  /// Any other filesystem failure, surfaced verbatim.
  #[error("{}: {source}", path.display())]
  Io {
    /// The path the failing operation was issued against.
    path: PathBuf,
    /// The original filesystem error.
    #[source]
    source: io::Error,
  },
}

/// Ensures that a directory exists at `path`, creating missing parents.
///
/// `mode` applies to the target path only; intermediate directories always
/// get the filesystem's default creation mode. When `mode` is `None` an
/// existing directory's mode is never rewritten.
///
/// The path is resolved against the process working directory before use.
///
/// # Example
///
/// ```rust,no_run
/// use mkdirp_stream::{Mode, ensure_dir};
///
/// # async fn example() -> Result<(), mkdirp_stream::EnsureDirError> {
/// ensure_dir("out/a/b/c", Some(Mode::from(0o700))).await?;
/// # Ok(())
/// # }
/// ```
pub async fn ensure_dir(path: impl AsRef<Path>, mode: Option<Mode>) -> Result<(), EnsureDirError> {
  ensure_dir_with(&TokioFs, path, mode).await
}

/// Ensures that a directory exists at `path` using the given [`DirFs`].
///
/// This is the generic entry point behind [`ensure_dir`]; it exists so tests
/// and embedders can supply their own filesystem collaborator.
pub async fn ensure_dir_with<F>(
  fs: &F,
  path: impl AsRef<Path>,
  mode: Option<Mode>,
) -> Result<(), EnsureDirError>
where
  F: DirFs + ?Sized,
{
  let resolved = std::path::absolute(path.as_ref()).map_err(|source| EnsureDirError::Io {
    path: path.as_ref().to_path_buf(),
    source,
  })?;
  ensure_resolved(fs, resolved, mode).await
}

/// Recursive core over an already-resolved absolute path.
fn ensure_resolved<'a, F>(
  fs: &'a F,
  path: PathBuf,
  mode: Option<Mode>,
) -> BoxFuture<'a, Result<(), EnsureDirError>>
where
  F: DirFs + ?Sized,
{
  Box::pin(async move {
    match fs.create_dir(&path, mode).await {
      Ok(()) => reconcile(fs, &path, mode, None).await,
      Err(create_err) => match create_err.kind() {
        io::ErrorKind::NotFound => {
          let Some(parent) = path.parent().map(Path::to_path_buf) else {
            return Err(EnsureDirError::Io {
              path,
              source: create_err,
            });
          };
          debug!(path = %path.display(), "parent missing, ensuring it first");
          ensure_resolved(fs, parent, None).await?;
          ensure_resolved(fs, path, mode).await
        }
        io::ErrorKind::AlreadyExists => reconcile(fs, &path, mode, Some(create_err)).await,
        _ => Err(EnsureDirError::Io {
          path,
          source: create_err,
        }),
      },
    }
  })
}

/// Stats `path` and reconciles the on-disk entry with the requested mode.
///
/// `create_err` is the `AlreadyExists` error when the entry predates this
/// call, and `None` when the directory was just created.
async fn reconcile<F>(
  fs: &F,
  path: &Path,
  mode: Option<Mode>,
  create_err: Option<io::Error>,
) -> Result<(), EnsureDirError>
where
  F: DirFs + ?Sized,
{
  let meta = match fs.stat(path).await {
    Ok(meta) => meta,
    Err(stat_err) => return Err(classify_stat_error(fs, path, stat_err).await),
  };

  if !meta.is_dir {
    let source =
      create_err.unwrap_or_else(|| io::Error::new(io::ErrorKind::AlreadyExists, "not a directory"));
    return Err(EnsureDirError::Conflict {
      path: conflict_path(fs, path).await,
      source,
    });
  }

  let Some(mode) = mode else {
    return Ok(());
  };
  if meta.mode == mode {
    return Ok(());
  }

  debug!(path = %path.display(), on_disk = %meta.mode, requested = %mode, "reconciling mode");
  fs.set_mode(path, mode)
    .await
    .map_err(|source| EnsureDirError::Io {
      path: path.to_path_buf(),
      source,
    })
}

/// Classifies a stat failure on an entry that the create call said exists.
///
/// `NotFound` from a stat that follows symlinks means the entry itself is a
/// symlink whose target is missing; anything else propagates as-is.
async fn classify_stat_error<F>(fs: &F, path: &Path, stat_err: io::Error) -> EnsureDirError
where
  F: DirFs + ?Sized,
{
  if stat_err.kind() == io::ErrorKind::NotFound {
    if let Ok(target) = fs.read_link(path).await {
      // The target is reported as written in the link, unresolved.
      return EnsureDirError::MissingTarget {
        target,
        source: stat_err,
      };
    }
  }
  EnsureDirError::Io {
    path: path.to_path_buf(),
    source: stat_err,
  }
}

/// Returns the path a conflict should be reported against.
///
/// When the entry is a symlink the conflict lives at its target, not at the
/// link itself.
async fn conflict_path<F>(fs: &F, path: &Path) -> PathBuf
where
  F: DirFs + ?Sized,
{
  match fs.read_link(path).await {
    Ok(target) => resolve_link_target(path, &target),
    Err(_) => path.to_path_buf(),
  }
}

/// Resolves a (possibly relative) link target against the link's parent.
fn resolve_link_target(link: &Path, target: &Path) -> PathBuf {
  if target.is_absolute() {
    target.to_path_buf()
  } else {
    match link.parent() {
      Some(parent) => parent.join(target),
      None => target.to_path_buf(),
    }
  }
}
