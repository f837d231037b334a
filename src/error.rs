//! # Error Handling System
//!
//! Error types for stream processing, providing rich error context and proper
//! error propagation.
//!
//! ## Core Types
//!
//! - **[`StreamError`]**: Rich error context with source, component info, and
//!   the item being processed when the failure occurred
//! - **[`ErrorContext`]**: Timestamp, item, and component identification
//! - **[`ComponentInfo`]**: Component name and type information for reporting
//!
//! Every stream error is terminal: a transformer that encounters one yields it
//! as the final element of its output stream and stops. There is no skip or
//! per-item retry semantics; directory creation is a precondition that either
//! fully holds or the downstream work must not proceed.
//!
//! The filesystem-level taxonomy (conflicts, dangling symlink targets,
//! passthrough I/O errors) lives in [`crate::fs::EnsureDirError`]; it arrives
//! here as the `source` of a [`StreamError`].

use std::error::Error;
use std::fmt;

/// Error that occurred during stream processing.
///
/// This error type provides context about where and when an error occurred,
/// making it easier to debug and handle errors appropriately.
///
/// # Fields
///
/// * `source` - The original error that occurred
/// * `context` - Context about when and where the error occurred
/// * `component` - Information about the component that encountered the error
#[derive(Debug)]
pub struct StreamError<T> {
  /// The original error that occurred.
  pub source: Box<dyn Error + Send + Sync>,
  /// Context about when and where the error occurred.
  pub context: ErrorContext<T>,
  /// Information about the component that encountered the error.
  pub component: ComponentInfo,
}

impl<T: std::fmt::Debug + Clone + Send + Sync> StreamError<T> {
  /// Creates a new `StreamError` with the given source error, context, and
  /// component information.
  pub fn new(
    source: Box<dyn Error + Send + Sync>,
    context: ErrorContext<T>,
    component: ComponentInfo,
  ) -> Self {
    Self {
      source,
      context,
      component,
    }
  }
}

impl<T: std::fmt::Debug + Clone + Send + Sync> Clone for StreamError<T> {
  fn clone(&self) -> Self {
    Self {
      source: Box::new(StringError(self.source.to_string())),
      context: self.context.clone(),
      component: self.component.clone(),
    }
  }
}

impl<T: std::fmt::Debug + Clone + Send + Sync> fmt::Display for StreamError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Error in {} ({}): {}",
      self.component.name, self.component.type_name, self.source
    )
  }
}

impl<T: std::fmt::Debug + Clone + Send + Sync> Error for StreamError<T> {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    Some(self.source.as_ref())
  }
}

/// A simple error type that wraps a string message.
///
/// This is useful for creating errors from string messages without needing to
/// implement a full error type. Cloning a [`StreamError`] flattens its source
/// into a `StringError`.
#[derive(Debug)]
pub struct StringError(
  /// The error message.
  pub String,
);

impl fmt::Display for StringError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl Error for StringError {}

/// Context information about when and where an error occurred.
///
/// This struct provides detailed information about the circumstances
/// surrounding an error, including the timestamp, the item being processed
/// (if any), and the component that encountered the error.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext<T> {
  /// The timestamp when the error occurred.
  pub timestamp: chrono::DateTime<chrono::Utc>,
  /// The item being processed when the error occurred, if available.
  pub item: Option<T>,
  /// The name of the component that encountered the error.
  pub component_name: String,
  /// The type of the component that encountered the error.
  pub component_type: String,
}

impl<T: std::fmt::Debug + Clone + Send + Sync> Default for ErrorContext<T> {
  fn default() -> Self {
    Self {
      timestamp: chrono::Utc::now(),
      item: None,
      component_name: "default".to_string(),
      component_type: "default".to_string(),
    }
  }
}

/// Information about a component for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentInfo {
  /// The name of the component.
  pub name: String,
  /// The type name of the component.
  pub type_name: String,
}

impl ComponentInfo {
  /// Creates a new `ComponentInfo` with the given name and type name.
  pub fn new(name: String, type_name: String) -> Self {
    Self { name, type_name }
  }
}
