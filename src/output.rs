//! Output trait for components that produce output streams.
//!
//! The [`Output`] trait defines the interface for components that generate
//! data for downstream components. Transformers implement it alongside
//! [`crate::Input`]; the pair keeps pipeline connections type-safe.

use futures::Stream;

/// Trait for components that can produce output streams.
///
/// This trait defines the interface for components that generate data streams.
/// It is implemented by producers and transformers.
pub trait Output
where
  Self::Output: Send + 'static,
{
  /// The type of items produced by this component.
  type Output;
  /// The output stream type that yields items of type `Self::Output`.
  type OutputStream: Stream<Item = Self::Output> + Send + 'static;
}
