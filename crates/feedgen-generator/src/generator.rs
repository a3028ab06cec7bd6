//! The run orchestrator.
//!
//! A run is `initialize` → `fetch_items` → `process_items`. The generator
//! does no error recovery: the first failing component ends the run and
//! its error is returned to the caller.

use std::sync::Arc;

use feedgen_core::{ComponentSpec, StoreConfig};
use uuid::Uuid;

use crate::error::GeneratorError;
use crate::fetcher::Fetcher;
use crate::item::ItemRef;
use crate::observer::{GeneratorObserver, PipelineState};
use crate::processor::Processor;
use crate::registry::Registry;

pub struct Generator {
    registry: Arc<Registry>,
    fetcher_specs: Vec<ComponentSpec>,
    processor_specs: Vec<ComponentSpec>,
    state: PipelineState,
    observers: Vec<Box<dyn GeneratorObserver>>,
}

impl Generator {
    /// Component specs are kept in the given order, which is the order
    /// components run in.
    #[must_use]
    pub fn new(
        registry: Arc<Registry>,
        fetchers: Vec<ComponentSpec>,
        processors: Vec<ComponentSpec>,
    ) -> Self {
        Self {
            registry,
            fetcher_specs: fetchers,
            processor_specs: processors,
            state: PipelineState::default(),
            observers: Vec::new(),
        }
    }

    #[must_use]
    pub fn for_store(registry: Arc<Registry>, store: &StoreConfig) -> Self {
        Self::new(registry, store.fetchers.clone(), store.processors.clone())
    }

    /// Subscribes `observer` to lifecycle events. Observers are notified in
    /// subscription order.
    pub fn subscribe(&mut self, observer: Box<dyn GeneratorObserver>) -> &mut Self {
        self.observers.push(observer);
        self
    }

    /// Creates every configured fetcher and processor, then notifies
    /// `initialized`. Replaces any components from an earlier call.
    ///
    /// # Errors
    ///
    /// Returns the registry's error for the first component that cannot be
    /// created. Previously initialized components are left as they were.
    pub fn initialize(&mut self) -> Result<(), GeneratorError> {
        let mut fetchers: Vec<(String, Box<dyn Fetcher>)> =
            Vec::with_capacity(self.fetcher_specs.len());
        for spec in &self.fetcher_specs {
            let fetcher = self.registry.fetchers.create(&spec.name, spec.config.clone())?;
            fetchers.push((spec.name.clone(), fetcher));
        }

        let mut processors: Vec<(String, Box<dyn Processor>)> =
            Vec::with_capacity(self.processor_specs.len());
        for spec in &self.processor_specs {
            let processor = self
                .registry
                .processors
                .create(&spec.name, spec.config.clone())?;
            processors.push((spec.name.clone(), processor));
        }

        self.state.fetchers = fetchers;
        self.state.processors = processors;

        for observer in &mut self.observers {
            observer.initialized(&mut self.state);
        }
        Ok(())
    }

    /// Replaces the working set with the concatenated output of every
    /// fetcher, in fetcher order. No deduplication happens here.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Fetch`] for the first fetcher that fails.
    pub fn fetch_items(&mut self) -> Result<(), GeneratorError> {
        self.state.items.clear();

        for (name, fetcher) in &mut self.state.fetchers {
            tracing::debug!(fetcher = %name, "fetching items");
            let items = fetcher.fetch().map_err(|source| GeneratorError::Fetch {
                fetcher: name.clone(),
                source,
            })?;
            tracing::debug!(fetcher = %name, count = items.len(), "items fetched");
            self.state.items.extend(items);
        }

        for observer in &mut self.observers {
            observer.items_fetched(&self.state);
        }
        Ok(())
    }

    /// Runs every processor in order. Each one receives the items that are
    /// not skipped at the moment it starts, so skip flags set while one
    /// processor runs only affect the processors after it.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Process`] for the first processor that
    /// fails.
    pub fn process_items(&mut self) -> Result<(), GeneratorError> {
        for (name, processor) in &mut self.state.processors {
            let items: Vec<ItemRef> = self
                .state
                .items
                .iter()
                .filter(|item| !item.is_skip())
                .cloned()
                .collect();

            tracing::debug!(processor = %name, count = items.len(), "processing items");
            processor
                .process(&items)
                .map_err(|source| GeneratorError::Process {
                    processor: name.clone(),
                    source,
                })?;
        }

        for observer in &mut self.observers {
            observer.items_processed(&self.state);
        }
        Ok(())
    }

    /// Initializes, fetches and processes, in that order.
    ///
    /// # Errors
    ///
    /// Returns the first error from any stage.
    pub fn run(&mut self) -> Result<(), GeneratorError> {
        let run_id = Uuid::new_v4();
        let span = tracing::debug_span!("generator_run", %run_id);
        let _entered = span.enter();

        tracing::debug!(
            fetchers = self.fetcher_specs.len(),
            processors = self.processor_specs.len(),
            "generator run started"
        );

        self.initialize()?;
        self.fetch_items()?;
        self.process_items()?;

        tracing::debug!(items = self.state.items.len(), "generator run finished");
        Ok(())
    }

    /// The current working set, including skipped items.
    #[must_use]
    pub fn items(&self) -> &[ItemRef] {
        &self.state.items
    }

    #[must_use]
    pub fn state(&self) -> &PipelineState {
        &self.state
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("fetchers", &self.fetcher_specs)
            .field("processors", &self.processor_specs)
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
