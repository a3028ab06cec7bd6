//! The unit of work flowing through the pipeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use feedgen_core::CatalogProduct;

use crate::error::FetchError;

/// Shared handle to an [`Item`].
///
/// A variant is usually reachable twice: as a top-level item and as an
/// associate of its parent. Both paths point at the same allocation, so a
/// skip flag set through the parent is seen by the generator's filter.
pub type ItemRef = Arc<Item>;

/// One catalog entity plus its associated variants and a skip flag.
#[derive(Debug)]
pub struct Item {
    product: CatalogProduct,
    associates: Vec<ItemRef>,
    skip: AtomicBool,
}

impl Item {
    #[must_use]
    pub fn new(product: CatalogProduct) -> Self {
        Self {
            product,
            associates: Vec::new(),
            skip: AtomicBool::new(false),
        }
    }

    /// Builds an item with associated variants.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::SelfAssociate`] if an associate carries the
    /// same entity ID as `product`, and [`FetchError::NestedAssociates`] if
    /// an associate has associates of its own.
    pub fn with_associates(
        product: CatalogProduct,
        associates: Vec<ItemRef>,
    ) -> Result<Self, FetchError> {
        for associate in &associates {
            if associate.id() == product.id {
                return Err(FetchError::SelfAssociate { id: product.id });
            }
            if associate.has_associates() {
                return Err(FetchError::NestedAssociates {
                    parent: product.id,
                    associate: associate.id().to_string(),
                });
            }
        }

        Ok(Self {
            product,
            associates,
            skip: AtomicBool::new(false),
        })
    }

    #[must_use]
    pub fn into_ref(self) -> ItemRef {
        Arc::new(self)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.product.id
    }

    #[must_use]
    pub fn product(&self) -> &CatalogProduct {
        &self.product
    }

    #[must_use]
    pub fn associates(&self) -> &[ItemRef] {
        &self.associates
    }

    #[must_use]
    pub fn has_associates(&self) -> bool {
        !self.associates.is_empty()
    }

    /// Excludes this item from every processor that filters after this call.
    pub fn skip(&self) {
        self.set_skip(true);
    }

    pub fn set_skip(&self, skip: bool) {
        self.skip.store(skip, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_skip(&self) -> bool {
        self.skip.load(Ordering::Relaxed)
    }
}
