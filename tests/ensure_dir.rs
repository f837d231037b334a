use std::io;
use std::os::unix::fs::symlink;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use mkdirp_stream::{DirFs, DirMeta, EnsureDirError, Mode, TokioFs, ensure_dir, ensure_dir_with};
use tempfile::TempDir;
use tokio_test::assert_ok;

/// lstat the path and mask its mode like the algorithm does.
fn masked(path: &Path) -> u32 {
  std::fs::symlink_metadata(path).unwrap().mode() & 0o7777
}

/// The umask-adjusted mode a plain `mkdir` produces on this system.
fn default_dir_mode(base: &Path) -> u32 {
  let probe = base.join("mode-probe");
  std::fs::create_dir(&probe).unwrap();
  let mode = masked(&probe);
  std::fs::remove_dir(&probe).unwrap();
  mode
}

#[tokio::test]
async fn makes_a_single_directory() {
  let tmp = TempDir::new().unwrap();
  let dirpath = tmp.path().join("foo");

  tokio_test::assert_ok!(ensure_dir(&dirpath, None).await);
  assert!(dirpath.is_dir());
}

#[tokio::test]
async fn single_directory_gets_the_default_mode() {
  let tmp = TempDir::new().unwrap();
  let dirpath = tmp.path().join("foo");

  ensure_dir(&dirpath, None).await.unwrap();
  assert_eq!(masked(&dirpath), default_dir_mode(tmp.path()));
}

#[tokio::test]
async fn makes_multiple_directories() {
  let tmp = TempDir::new().unwrap();
  let nested = tmp.path().join("foo/bar/baz");

  tokio_test::assert_ok!(ensure_dir(&nested, None).await);
  assert!(nested.is_dir());
}

#[tokio::test]
async fn multiple_directories_get_the_default_mode() {
  let tmp = TempDir::new().unwrap();
  let nested = tmp.path().join("foo/bar/baz");
  let default_mode = default_dir_mode(tmp.path());

  ensure_dir(&nested, None).await.unwrap();
  assert_eq!(masked(&nested), default_mode);
}

#[tokio::test]
async fn makes_directory_with_custom_mode() {
  let tmp = TempDir::new().unwrap();
  let dirpath = tmp.path().join("foo");

  ensure_dir(&dirpath, Some(Mode::from(0o700))).await.unwrap();
  assert_eq!(masked(&dirpath), 0o700);
}

#[tokio::test]
async fn creates_directory_with_setgid_permission() {
  let tmp = TempDir::new().unwrap();
  let dirpath = tmp.path().join("foo");

  ensure_dir(&dirpath, Some(Mode::from(0o2700)))
    .await
    .unwrap();
  assert_eq!(masked(&dirpath), 0o2700);
}

#[tokio::test]
async fn accepts_octal_string_modes() {
  let tmp = TempDir::new().unwrap();
  let dirpath = tmp.path().join("foo");
  let mode: Mode = "700".parse().unwrap();

  ensure_dir(&dirpath, Some(mode)).await.unwrap();
  assert_eq!(masked(&dirpath), 0o700);
}

#[tokio::test]
async fn is_idempotent_without_a_mode() {
  let tmp = TempDir::new().unwrap();
  let dirpath = tmp.path().join("foo");

  ensure_dir(&dirpath, None).await.unwrap();
  let mode_after_first = masked(&dirpath);

  tokio_test::assert_ok!(ensure_dir(&dirpath, None).await);
  assert_eq!(masked(&dirpath), mode_after_first);
}

#[tokio::test]
async fn does_not_change_mode_if_directory_exists_and_no_mode_given() {
  let tmp = TempDir::new().unwrap();
  let dirpath = tmp.path().join("foo");

  ensure_dir(&dirpath, Some(Mode::from(0o700))).await.unwrap();
  ensure_dir(&dirpath, None).await.unwrap();
  assert_eq!(masked(&dirpath), 0o700);
}

#[tokio::test]
async fn makes_multiple_directories_with_custom_mode() {
  let tmp = TempDir::new().unwrap();
  let nested = tmp.path().join("foo/bar/baz");

  ensure_dir(&nested, Some(Mode::from(0o700))).await.unwrap();
  assert_eq!(masked(&nested), 0o700);
}

#[tokio::test]
async fn uses_default_mode_on_intermediate_directories() {
  let tmp = TempDir::new().unwrap();
  let outer = tmp.path().join("foo");
  let intermediate = tmp.path().join("foo/bar");
  let nested = tmp.path().join("foo/bar/baz");
  let default_mode = default_dir_mode(tmp.path());

  ensure_dir(&nested, Some(Mode::from(0o700))).await.unwrap();
  assert_eq!(masked(&outer), default_mode);
  assert_eq!(masked(&intermediate), default_mode);
  assert_eq!(masked(&nested), 0o700);
}

#[tokio::test]
async fn changes_mode_of_existing_directory() {
  let tmp = TempDir::new().unwrap();
  let dirpath = tmp.path().join("foo");

  ensure_dir(&dirpath, None).await.unwrap();
  assert_eq!(masked(&dirpath), default_dir_mode(tmp.path()));

  ensure_dir(&dirpath, Some(Mode::from(0o700))).await.unwrap();
  assert_eq!(masked(&dirpath), 0o700);
}

#[tokio::test]
async fn fails_with_conflict_if_file_in_path() {
  let tmp = TempDir::new().unwrap();
  let filepath = tmp.path().join("test.txt");
  std::fs::write(&filepath, "Hello World!\n").unwrap();

  let err = ensure_dir(&filepath, None).await.unwrap_err();
  match err {
    EnsureDirError::Conflict { path, .. } => assert_eq!(path, filepath),
    other => panic!("expected Conflict, got {other:?}"),
  }
}

#[tokio::test]
async fn propagates_errors_below_a_file_verbatim() {
  let tmp = TempDir::new().unwrap();
  let filepath = tmp.path().join("test.txt");
  std::fs::write(&filepath, "Hello World!\n").unwrap();

  // mkdir under a file parent fails with ENOTDIR, which is neither the
  // missing-parent nor the already-exists case.
  let err = ensure_dir(filepath.join("child"), None).await.unwrap_err();
  match err {
    EnsureDirError::Io { source, .. } => {
      assert_ne!(source.kind(), io::ErrorKind::NotFound);
      assert_ne!(source.kind(), io::ErrorKind::AlreadyExists);
    }
    other => panic!("expected Io, got {other:?}"),
  }
}

#[tokio::test]
async fn does_not_change_mode_of_existing_file() {
  let tmp = TempDir::new().unwrap();
  let filepath = tmp.path().join("test.txt");
  std::fs::write(&filepath, "Hello World!\n").unwrap();
  let expected_mode = masked(&filepath);

  let result = ensure_dir(&filepath, Some(Mode::from(0o700))).await;
  assert!(result.is_err());
  assert_eq!(masked(&filepath), expected_mode);
}

#[tokio::test]
async fn accepts_symlink_to_directory_and_applies_mode_to_target() {
  let tmp = TempDir::new().unwrap();
  let target = tmp.path().join("real");
  let link = tmp.path().join("link");
  std::fs::create_dir(&target).unwrap();
  symlink(&target, &link).unwrap();

  ensure_dir(&link, Some(Mode::from(0o700))).await.unwrap();

  // The link is untouched; the mode lands on the target.
  assert!(std::fs::symlink_metadata(&link).unwrap().is_symlink());
  assert_eq!(masked(&target), 0o700);
}

#[tokio::test]
async fn fails_with_conflict_referencing_symlink_target() {
  let tmp = TempDir::new().unwrap();
  let target = tmp.path().join("file.txt");
  let link = tmp.path().join("link");
  std::fs::write(&target, "contents").unwrap();
  symlink(&target, &link).unwrap();

  let err = ensure_dir(&link, None).await.unwrap_err();
  match err {
    EnsureDirError::Conflict { path, .. } => assert_eq!(path, target),
    other => panic!("expected Conflict, got {other:?}"),
  }
}

#[tokio::test]
async fn fails_with_missing_target_for_dangling_symlink() {
  let tmp = TempDir::new().unwrap();
  let target = tmp.path().join("does-not-exist");
  let link = tmp.path().join("link");
  symlink(&target, &link).unwrap();

  let err = ensure_dir(&link, None).await.unwrap_err();
  match err {
    EnsureDirError::MissingTarget {
      target: reported, ..
    } => assert_eq!(reported, target),
    other => panic!("expected MissingTarget, got {other:?}"),
  }
}

/// Wraps [`TokioFs`] and counts change-mode calls.
struct CountingFs {
  inner: TokioFs,
  set_mode_calls: AtomicUsize,
}

impl CountingFs {
  fn new() -> Self {
    Self {
      inner: TokioFs,
      set_mode_calls: AtomicUsize::new(0),
    }
  }
}

#[async_trait]
impl DirFs for CountingFs {
  async fn create_dir(&self, path: &Path, mode: Option<Mode>) -> io::Result<()> {
    self.inner.create_dir(path, mode).await
  }

  async fn stat(&self, path: &Path) -> io::Result<DirMeta> {
    self.inner.stat(path).await
  }

  async fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
    self.inner.read_link(path).await
  }

  async fn set_mode(&self, path: &Path, mode: Mode) -> io::Result<()> {
    self.set_mode_calls.fetch_add(1, Ordering::SeqCst);
    self.inner.set_mode(path, mode).await
  }
}

#[tokio::test]
async fn does_not_chmod_if_custom_mode_matches_mode_on_disk() {
  let tmp = TempDir::new().unwrap();
  let dirpath = tmp.path().join("foo");
  let fs = CountingFs::new();
  let mode = Some(Mode::from(0o700));

  ensure_dir_with(&fs, &dirpath, mode).await.unwrap();
  let calls_after_create = fs.set_mode_calls.load(Ordering::SeqCst);

  ensure_dir_with(&fs, &dirpath, mode).await.unwrap();
  assert_eq!(fs.set_mode_calls.load(Ordering::SeqCst), calls_after_create);
}

/// Delegates the first create to the real filesystem, then fails.
struct FailingCreateFs {
  inner: TokioFs,
  create_calls: AtomicUsize,
}

#[async_trait]
impl DirFs for FailingCreateFs {
  async fn create_dir(&self, path: &Path, mode: Option<Mode>) -> io::Result<()> {
    if self.create_calls.fetch_add(1, Ordering::SeqCst) == 0 {
      self.inner.create_dir(path, mode).await
    } else {
      Err(io::Error::other("boom"))
    }
  }

  async fn stat(&self, path: &Path) -> io::Result<DirMeta> {
    self.inner.stat(path).await
  }

  async fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
    self.inner.read_link(path).await
  }

  async fn set_mode(&self, path: &Path, mode: Mode) -> io::Result<()> {
    self.inner.set_mode(path, mode).await
  }
}

#[tokio::test]
async fn surfaces_create_errors_happening_during_recursion() {
  let tmp = TempDir::new().unwrap();
  let nested = tmp.path().join("foo/bar/baz");
  let fs = FailingCreateFs {
    inner: TokioFs,
    create_calls: AtomicUsize::new(0),
  };

  // First create hits NotFound for real; the parent recursion then blows up.
  let err = ensure_dir_with(&fs, &nested, None).await.unwrap_err();
  match err {
    EnsureDirError::Io { source, .. } => assert_eq!(source.to_string(), "boom"),
    other => panic!("expected Io, got {other:?}"),
  }
  assert!(!nested.exists());
}

/// Succeeds at creation but fails every stat.
struct FailingStatFs {
  inner: TokioFs,
}

#[async_trait]
impl DirFs for FailingStatFs {
  async fn create_dir(&self, path: &Path, mode: Option<Mode>) -> io::Result<()> {
    self.inner.create_dir(path, mode).await
  }

  async fn stat(&self, _path: &Path) -> io::Result<DirMeta> {
    Err(io::Error::other("boom"))
  }

  async fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
    self.inner.read_link(path).await
  }

  async fn set_mode(&self, path: &Path, mode: Mode) -> io::Result<()> {
    self.inner.set_mode(path, mode).await
  }
}

#[tokio::test]
async fn surfaces_stat_errors() {
  let tmp = TempDir::new().unwrap();
  let dirpath = tmp.path().join("foo");
  let fs = FailingStatFs { inner: TokioFs };

  let err = ensure_dir_with(&fs, &dirpath, None).await.unwrap_err();
  match err {
    EnsureDirError::Io { source, .. } => assert_eq!(source.to_string(), "boom"),
    other => panic!("expected Io, got {other:?}"),
  }
}
