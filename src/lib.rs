//! # mkdirp-stream
//!
//! Recursive, mode-aware directory creation and a stream transformer that
//! ensures a per-item directory exists before forwarding the item downstream.
//!
//! ## Key Features
//!
//! - **Recursive Creation**: [`ensure_dir`] creates a directory and any missing
//!   parents, reconciling with whatever already exists on disk
//! - **Mode Reconciliation**: an optional [`Mode`] is applied to the target
//!   directory only, never to intermediate directories, and a change-mode call
//!   is only issued when the on-disk mode actually differs
//! - **Symlink Aware**: a symlink to a directory satisfies the contract;
//!   dangling symlinks and symlinks to non-directories fail with errors that
//!   name the link *target*
//! - **Stream Stage**: [`MkdirpTransformer`] resolves a directory per item,
//!   ensures it exists, and forwards the item unchanged, with exactly one item
//!   in flight at a time
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mkdirp_stream::{Mode, ensure_dir};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a deep path, applying 0700 to the leaf only.
//! ensure_dir("/var/tmp/out/a/b/c", Some(Mode::from(0o700))).await?;
//!
//! // Idempotent: a second call succeeds and changes nothing.
//! ensure_dir("/var/tmp/out/a/b/c", None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use mkdirp_stream::{MkdirpTransformer, Transformer};
//!
//! # async fn example() {
//! // Every chunk is forwarded once its output directory exists.
//! let mut transformer = MkdirpTransformer::<String>::with_path("/var/tmp/out");
//! let input = Box::pin(futures::stream::iter(vec!["chunk".to_string()]));
//! let mut output = transformer.transform(input).await;
//! while let Some(item) = output.next().await {
//!   println!("forwarded: {:?}", item);
//! }
//! # }
//! ```

// Documentation enforcement - treat missing docs as errors
#![deny(missing_docs)]

/// Error types for stream processing.
pub mod error;
/// Filesystem collaborators: modes, the `DirFs` trait, and recursive creation.
pub mod fs;
/// Input trait for components that consume input streams.
pub mod input;
/// Output trait for components that produce output streams.
pub mod output;
/// Core transformer trait and configuration.
pub mod transformer;
/// Collection of built-in transformers.
pub mod transformers;

pub use error::{ComponentInfo, ErrorContext, StreamError};
pub use fs::{
  DirFs, DirMeta, EnsureDirError, MODE_MASK, Mode, ParseModeError, TokioFs, ensure_dir,
  ensure_dir_with,
};
pub use input::Input;
pub use output::Output;
pub use transformer::{Transformer, TransformerConfig};
pub use transformers::{DirTarget, MkdirpTransformer, ResolveError};
