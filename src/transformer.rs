//! # Transformer Trait
//!
//! This module defines the [`Transformer`] trait for components that transform
//! data streams. Transformers process items as they flow through a pipeline,
//! consuming an input stream and producing an output stream.
//!
//! ## Overview
//!
//! The Transformer trait provides:
//!
//! - **Stream Transformation**: Async transformation of input streams into
//!   output streams
//! - **Component Information**: Name and type information for debugging
//! - **Configuration**: [`TransformerConfig`] for component naming
//!
//! ## Example
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use mkdirp_stream::{MkdirpTransformer, Transformer};
//!
//! # async fn example() {
//! let mut transformer = MkdirpTransformer::<String>::with_path("/var/tmp/out")
//!   .with_name("ensure-output-dir".to_string());
//! let input = Box::pin(futures::stream::iter(vec!["chunk".to_string()]));
//! let mut output = transformer.transform(input).await;
//! while let Some(item) = output.next().await {
//!   println!("forwarded: {:?}", item);
//! }
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Transformers in this crate treat every failure as terminal for the whole
//! stream: the output stream yields one final `Err` and ends. There is no
//! skip-and-continue or per-item retry mode, so the configuration carries no
//! error strategy, only a component name used in logs and error reports.

use crate::error::{ComponentInfo, ErrorContext};
use crate::{input::Input, output::Output};
use async_trait::async_trait;

/// Configuration for transformers.
///
/// This struct holds configuration options that can be applied to any
/// transformer, currently the optional component name used for identification
/// in logs and error reports.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransformerConfig {
  /// Optional name for identifying this transformer in logs and errors.
  pub name: Option<String>,
}

impl TransformerConfig {
  /// Sets the name for this transformer configuration.
  #[must_use]
  pub fn with_name(mut self, name: String) -> Self {
    self.name = Some(name);
    self
  }

  /// Returns the current name, if set.
  pub fn name(&self) -> Option<String> {
    self.name.clone()
  }
}

/// Trait for components that transform data streams.
///
/// Transformers process items as they flow through the pipeline. They can
/// filter, map, enrich, or perform side effects per item before forwarding.
#[async_trait]
pub trait Transformer: Input + Output
where
  Self::Input: std::fmt::Debug + Clone + Send + Sync,
{
  /// Transforms a stream of input items into a stream of output items.
  ///
  /// This method is called by the pipeline to process items. The transformer
  /// receives items from the previous component and produces items for the
  /// next component.
  async fn transform(&mut self, input: Self::InputStream) -> Self::OutputStream;

  /// Creates a new transformer instance with the given configuration.
  #[must_use]
  fn with_config(&self, config: TransformerConfig) -> Self
  where
    Self: Sized + Clone,
  {
    let mut this = self.clone();
    this.set_config(config);
    this
  }

  /// Sets the configuration for this transformer.
  fn set_config(&mut self, config: TransformerConfig) {
    self.set_config_impl(config);
  }

  /// Returns a reference to the transformer's configuration.
  fn config(&self) -> &TransformerConfig {
    self.get_config_impl()
  }

  /// Returns a mutable reference to the transformer's configuration.
  fn config_mut(&mut self) -> &mut TransformerConfig {
    self.get_config_mut_impl()
  }

  /// Creates an error context for error reporting.
  ///
  /// This method constructs an [`ErrorContext`] with the current timestamp,
  /// the item that caused the error (if any), and component information.
  fn create_error_context(&self, item: Option<Self::Input>) -> ErrorContext<Self::Input> {
    ErrorContext {
      timestamp: chrono::Utc::now(),
      item,
      component_name: self.component_info().name,
      component_type: self.component_info().type_name,
    }
  }

  /// Returns information about the component for error reporting.
  fn component_info(&self) -> ComponentInfo {
    ComponentInfo {
      name: self
        .config()
        .name()
        .unwrap_or_else(|| "transformer".to_string()),
      type_name: std::any::type_name::<Self>().to_string(),
    }
  }

  /// Sets the configuration implementation.
  ///
  /// This method must be implemented by each transformer to store the
  /// configuration.
  fn set_config_impl(&mut self, config: TransformerConfig);

  /// Returns a reference to the configuration implementation.
  fn get_config_impl(&self) -> &TransformerConfig;

  /// Returns a mutable reference to the configuration implementation.
  fn get_config_mut_impl(&mut self) -> &mut TransformerConfig;
}
