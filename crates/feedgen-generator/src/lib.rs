//! Catalog feed generation pipeline.
//!
//! A [`Generator`] builds its fetchers and processors from configuration
//! through a [`Registry`], runs every fetcher in order to assemble a working
//! set of [`Item`]s, then hands the non-skipped items to every processor in
//! order. Processors turn items into documents through the field resolvers
//! in [`map`], which own the variant merge rules for configurable products.

pub mod error;
pub mod fetcher;
pub mod generator;
pub mod item;
pub mod map;
pub mod observer;
pub mod processor;
pub mod registry;

#[cfg(test)]
mod test_support;

pub use error::{ComponentKind, FetchError, GeneratorError, MapError, ProcessError, SinkError};
pub use fetcher::Fetcher;
pub use generator::Generator;
pub use item::{Item, ItemRef};
pub use map::{FieldResolver, MapSettings, ResolverRegistry};
pub use observer::{GeneratorObserver, PipelineState};
pub use processor::{Document, DocumentSink, MemorySink, Processor};
pub use registry::{ComponentArgs, ComponentRegistry, Registry};
