//! Lifecycle notifications.

use crate::fetcher::Fetcher;
use crate::item::ItemRef;
use crate::processor::Processor;

/// The generator's mutable run state as seen by observers: its configured
/// components in execution order and the current working set.
#[derive(Default)]
pub struct PipelineState {
    pub(crate) fetchers: Vec<(String, Box<dyn Fetcher>)>,
    pub(crate) processors: Vec<(String, Box<dyn Processor>)>,
    pub(crate) items: Vec<ItemRef>,
}

impl PipelineState {
    /// Component identifiers of the fetchers, in execution order.
    #[must_use]
    pub fn fetcher_names(&self) -> Vec<&str> {
        self.fetchers.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Component identifiers of the processors, in execution order.
    #[must_use]
    pub fn processor_names(&self) -> Vec<&str> {
        self.processors.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Appends a fetcher that runs after the configured ones.
    pub fn add_fetcher(&mut self, name: impl Into<String>, fetcher: Box<dyn Fetcher>) {
        self.fetchers.push((name.into(), fetcher));
    }

    /// Appends a processor that runs after the configured ones.
    pub fn add_processor(&mut self, name: impl Into<String>, processor: Box<dyn Processor>) {
        self.processors.push((name.into(), processor));
    }

    /// Every fetched item, skipped or not, in fetch order.
    #[must_use]
    pub fn items(&self) -> &[ItemRef] {
        &self.items
    }
}

impl std::fmt::Debug for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineState")
            .field("fetchers", &self.fetcher_names())
            .field("processors", &self.processor_names())
            .field("items", &self.items.len())
            .finish()
    }
}

/// Receives the generator's lifecycle events. Every method defaults to a
/// no-op.
///
/// `initialized` fires after all configured components exist and before
/// anything is fetched, so it may add components. The later events see the
/// state read-only.
pub trait GeneratorObserver: Send {
    fn initialized(&mut self, _state: &mut PipelineState) {}

    fn items_fetched(&mut self, _state: &PipelineState) {}

    fn items_processed(&mut self, _state: &PipelineState) {}
}
