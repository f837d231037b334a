//! # Transformers Module
//!
//! Transformer implementations built on the [`crate::Transformer`] trait.
//!
//! Currently this is [`MkdirpTransformer`], which ensures a per-item
//! directory exists before forwarding the item downstream.

pub mod mkdirp_transformer;

pub use mkdirp_transformer::*;
