//! # Mkdirp Transformer
//!
//! Transformer that ensures a directory exists for each item before passing
//! the item through to the output stream. This lets a pipeline guarantee an
//! output location exists while continuing the main flow.
//!
//! ## Overview
//!
//! For each item, a caller-supplied resolver derives a [`DirTarget`] (a path
//! and an optional [`Mode`]), [`ensure_dir_with`] runs to completion, and only
//! then is the original item forwarded, unmodified and exactly once, in input
//! order. Exactly one item is in flight at a time: the next item is not pulled
//! from the input until the current one has been forwarded.
//!
//! Any failure - from the resolver or from directory creation - terminates
//! the whole stream: the output yields one final `Err` and ends. There is no
//! skip or per-item recovery; directory creation is a precondition for the
//! downstream work.
//!
//! ## Resolvers
//!
//! The resolver is a configuration-time choice:
//!
//! - [`MkdirpTransformer::with_path`] - every item maps to the same fixed
//!   path, with no mode
//! - [`MkdirpTransformer::new`] - a synchronous per-item function
//! - [`MkdirpTransformer::new_async`] - an asynchronous per-item function
//!
//! Whether items are opaque byte chunks or structured records is equally a
//! type-level choice: the mechanics are identical for any item type, only the
//! resolver interprets item content.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mkdirp_stream::{DirTarget, MkdirpTransformer, Mode};
//!
//! #[derive(Debug, Clone)]
//! struct Record {
//!   dirpath: String,
//! }
//!
//! // Extract the target directory from each record.
//! let transformer = MkdirpTransformer::new(|record: Record| {
//!   Ok(DirTarget::new(record.dirpath).with_mode(Mode::from(0o700)))
//! });
//! # let _ = transformer;
//! ```

use std::error::Error;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use futures::{Stream, StreamExt};
use tracing::error;

use crate::error::{ComponentInfo, ErrorContext, StreamError};
use crate::fs::{DirFs, Mode, TokioFs, ensure_dir_with};
use crate::transformer::{Transformer, TransformerConfig};
use crate::{Input, Output};

/// Boxed error produced by a resolver.
pub type ResolveError = Box<dyn Error + Send + Sync>;

// Resolvers are stored type-erased so sync closures, async closures, and the
// fixed-path shorthand all share one field.
type ResolverFn<T> =
  Arc<dyn Fn(T) -> BoxFuture<'static, Result<DirTarget, ResolveError>> + Send + Sync>;

/// The directory a stream item maps to: a path and an optional mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirTarget {
  path: PathBuf,
  mode: Option<Mode>,
}

impl DirTarget {
  /// Creates a target for `path` with no requested mode.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      mode: None,
    }
  }

  /// Requests a mode for the target directory.
  #[must_use]
  pub fn with_mode(mut self, mode: impl Into<Mode>) -> Self {
    self.mode = Some(mode.into());
    self
  }

  /// The target path.
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// The requested mode, if any.
  pub fn mode(&self) -> Option<Mode> {
    self.mode
  }
}

/// A transformer that ensures a per-item directory exists before forwarding
/// the item.
///
/// Output items are `Result`: every successfully processed item is forwarded
/// as `Ok`, and the first failure is yielded as a final `Err` after which the
/// stream ends.
///
/// # Example
///
/// ```rust,no_run
/// use mkdirp_stream::MkdirpTransformer;
///
/// // Every chunk waits for the same directory, then passes through.
/// let transformer = MkdirpTransformer::<String>::with_path("/var/tmp/out");
/// # let _ = transformer;
/// ```
pub struct MkdirpTransformer<T> {
  /// Derives the target directory for each item.
  resolver: ResolverFn<T>,
  /// Filesystem collaborator used by directory creation.
  fs: Arc<dyn DirFs>,
  /// Transformer configuration.
  config: TransformerConfig,
}

impl<T> MkdirpTransformer<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  /// Creates a transformer with a synchronous per-item resolver.
  pub fn new<F>(resolver: F) -> Self
  where
    F: Fn(T) -> Result<DirTarget, ResolveError> + Send + Sync + 'static,
  {
    Self::from_resolver(Arc::new(move |item| {
      futures::future::ready(resolver(item)).boxed()
    }))
  }

  /// Creates a transformer with an asynchronous per-item resolver.
  pub fn new_async<F, Fut>(resolver: F) -> Self
  where
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<DirTarget, ResolveError>> + Send + 'static,
  {
    Self::from_resolver(Arc::new(move |item| resolver(item).boxed()))
  }

  /// Creates a transformer that maps every item to the same fixed path, with
  /// no requested mode.
  pub fn with_path(path: impl Into<PathBuf>) -> Self {
    let path = path.into();
    Self::from_resolver(Arc::new(move |_item| {
      futures::future::ready(Ok(DirTarget::new(path.clone()))).boxed()
    }))
  }

  fn from_resolver(resolver: ResolverFn<T>) -> Self {
    Self {
      resolver,
      fs: Arc::new(TokioFs),
      config: TransformerConfig::default(),
    }
  }

  /// Replaces the filesystem collaborator used for directory creation.
  #[must_use]
  pub fn with_fs(mut self, fs: Arc<dyn DirFs>) -> Self {
    self.fs = fs;
    self
  }

  /// Sets the name for this transformer.
  #[must_use]
  pub fn with_name(mut self, name: String) -> Self {
    self.config.name = Some(name);
    self
  }
}

impl<T> Clone for MkdirpTransformer<T> {
  fn clone(&self) -> Self {
    Self {
      resolver: Arc::clone(&self.resolver),
      fs: Arc::clone(&self.fs),
      config: self.config.clone(),
    }
  }
}

impl<T> std::fmt::Debug for MkdirpTransformer<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MkdirpTransformer")
      .field("config", &self.config)
      .finish_non_exhaustive()
  }
}

impl<T> Input for MkdirpTransformer<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Input = T;
  type InputStream = Pin<Box<dyn Stream<Item = T> + Send>>;
}

impl<T> Output for MkdirpTransformer<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Output = Result<T, StreamError<T>>;
  type OutputStream = Pin<Box<dyn Stream<Item = Result<T, StreamError<T>>> + Send>>;
}

#[async_trait]
impl<T> Transformer for MkdirpTransformer<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  async fn transform(&mut self, input: Self::InputStream) -> Self::OutputStream {
    let resolver = Arc::clone(&self.resolver);
    let fs = Arc::clone(&self.fs);
    let component = self.component_info();

    Box::pin(async_stream::stream! {
      let mut input = input;
      while let Some(item) = input.next().await {
        let target = match (resolver)(item.clone()).await {
          Ok(target) => target,
          Err(source) => {
            error!(
              component = %component.name,
              error = %source,
              "resolver failed, stopping stream"
            );
            yield Err(stream_error(source, item, &component));
            return;
          }
        };

        if let Err(ensure_err) = ensure_dir_with(fs.as_ref(), target.path(), target.mode()).await {
          error!(
            component = %component.name,
            path = %target.path().display(),
            error = %ensure_err,
            "directory creation failed, stopping stream"
          );
          yield Err(stream_error(Box::new(ensure_err), item, &component));
          return;
        }

        // Directory confirmed present; forward the item unchanged.
        yield Ok(item);
      }
    })
  }

  fn set_config_impl(&mut self, config: TransformerConfig) {
    self.config = config;
  }

  fn get_config_impl(&self) -> &TransformerConfig {
    &self.config
  }

  fn get_config_mut_impl(&mut self) -> &mut TransformerConfig {
    &mut self.config
  }

  fn component_info(&self) -> ComponentInfo {
    ComponentInfo {
      name: self
        .config
        .name()
        .unwrap_or_else(|| "mkdirp_transformer".to_string()),
      type_name: std::any::type_name::<Self>().to_string(),
    }
  }
}

/// Wraps a failure into the terminal [`StreamError`] for the stream.
fn stream_error<T>(
  source: Box<dyn Error + Send + Sync>,
  item: T,
  component: &ComponentInfo,
) -> StreamError<T>
where
  T: std::fmt::Debug + Clone + Send + Sync,
{
  StreamError::new(
    source,
    ErrorContext {
      timestamp: chrono::Utc::now(),
      item: Some(item),
      component_name: component.name.clone(),
      component_type: component.type_name.clone(),
    },
    component.clone(),
  )
}
