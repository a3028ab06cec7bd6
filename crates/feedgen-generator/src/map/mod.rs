//! Field resolution: turning an [`Item`](crate::Item) into named values.
//!
//! [`ProductResolver`] reads a single entity. [`AssociateResolver`] wraps it
//! for variants folded into a parent, and [`ConfigurableResolver`] wraps it
//! for parents, merging variant values by the rules in [`merge`].
//! [`ResolverRegistry`] picks the resolver for an item by its `type_id`.

mod associate;
mod configurable;
pub mod merge;
mod product;
mod settings;

use std::collections::HashMap;
use std::sync::Arc;

use feedgen_core::FieldValue;

pub use associate::AssociateResolver;
pub use configurable::ConfigurableResolver;
pub use merge::{merge_availability, merge_values};
pub use product::{adjust_price, ProductResolver};
pub use settings::{MapSettings, PriceDisplay};

use crate::error::MapError;
use crate::item::ItemRef;

pub trait FieldResolver: Send {
    fn item(&self) -> &ItemRef;

    /// Runs once per item, before the first [`get`](Self::get). The only
    /// place a resolver may change item state (the skip flags).
    fn before(&mut self) {}

    /// Value of `field`, or [`FieldValue::Null`] to omit it.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] when the entity data needed for `field` is
    /// malformed.
    fn get(&mut self, field: &str) -> Result<FieldValue, MapError>;
}

type ResolverConstructor =
    Box<dyn Fn(ItemRef, Arc<MapSettings>) -> Box<dyn FieldResolver> + Send + Sync>;

/// Resolver constructors keyed by entity `type_id`. Types with no entry use
/// [`ProductResolver`].
pub struct ResolverRegistry {
    constructors: HashMap<String, ResolverConstructor>,
}

impl ResolverRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("configurable", |item, settings| {
            Box::new(ConfigurableResolver::new(item, settings))
        });
        registry
    }

    pub fn register<F>(&mut self, type_id: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(ItemRef, Arc<MapSettings>) -> Box<dyn FieldResolver> + Send + Sync + 'static,
    {
        self.constructors.insert(type_id.into(), Box::new(constructor));
        self
    }

    #[must_use]
    pub fn resolver_for(&self, item: &ItemRef, settings: &Arc<MapSettings>) -> Box<dyn FieldResolver> {
        let item = Arc::clone(item);
        let settings = Arc::clone(settings);
        match self.constructors.get(&item.product().type_id) {
            Some(constructor) => constructor(item, settings),
            None => Box::new(ProductResolver::new(item, settings)),
        }
    }
}

impl Default for ResolverRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        types.sort_unstable();
        f.debug_struct("ResolverRegistry")
            .field("types", &types)
            .finish()
    }
}
