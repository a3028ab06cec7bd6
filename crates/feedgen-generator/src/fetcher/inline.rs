use serde::Deserialize;

use super::catalog::{build_items, CatalogRecord};
use super::Fetcher;
use crate::error::{FetchError, GeneratorError};
use crate::item::ItemRef;
use crate::registry::ComponentArgs;

#[derive(Debug, Deserialize)]
struct InlineConfig {
    #[serde(default)]
    products: Vec<CatalogRecord>,
}

/// Serves entities embedded in the configuration payload. Each call to
/// `fetch` builds fresh items.
#[derive(Debug, Clone)]
pub struct InlineFetcher {
    records: Vec<CatalogRecord>,
}

impl InlineFetcher {
    pub const NAME: &'static str = "inline";

    #[must_use]
    pub fn new(records: Vec<CatalogRecord>) -> Self {
        Self { records }
    }

    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidComponentConfig`] if `products` is
    /// not a list of catalog records.
    pub fn from_args(args: &ComponentArgs) -> Result<Self, GeneratorError> {
        let config: InlineConfig = args.parse()?;
        Ok(Self::new(config.products))
    }
}

impl Fetcher for InlineFetcher {
    fn fetch(&mut self) -> Result<Vec<ItemRef>, FetchError> {
        build_items(self.records.clone())
    }
}
