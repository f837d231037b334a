//! Input trait for components that consume input streams.
//!
//! The [`Input`] trait defines the interface for components that receive data
//! from upstream. Transformers implement it alongside [`crate::Output`] so
//! stream connections stay type-safe: an upstream's output type must match the
//! downstream's input type.
//!
//! Items flow through as raw values; streams are pinned, boxed
//! `futures::Stream` trait objects so components can be composed without
//! naming concrete stream types.

use futures::Stream;

/// Trait for components that can consume input streams.
///
/// This trait defines the interface for components that receive data streams.
/// It is implemented by transformers and consumers.
pub trait Input
where
  Self::Input: Send + 'static,
{
  /// The type of items consumed by this component.
  type Input;
  /// The input stream type that yields items of type `Self::Input`.
  type InputStream: Stream<Item = Self::Input> + Send + 'static;
}
