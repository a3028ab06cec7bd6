use std::collections::HashMap;
use std::sync::Arc;

use feedgen_core::{FieldValue, Scalar};

use super::associate::AssociateResolver;
use super::merge::{merge_availability, merge_values};
use super::product::ProductResolver;
use super::settings::MapSettings;
use super::FieldResolver;
use crate::error::MapError;
use crate::item::ItemRef;

/// Field resolution for a configurable product and its variants.
///
/// In grouped mode (`split_configurable_products` off) `before` marks every
/// variant as skipped and each field read folds the variants' values into
/// the parent's. In split mode every read is plain product resolution.
#[derive(Debug)]
pub struct ConfigurableResolver {
    base: ProductResolver,
    grouped: bool,
    associates: HashMap<String, AssociateResolver>,
}

impl ConfigurableResolver {
    #[must_use]
    pub fn new(item: ItemRef, settings: Arc<MapSettings>) -> Self {
        Self {
            base: ProductResolver::new(item, settings),
            grouped: false,
            associates: HashMap::new(),
        }
    }

    #[must_use]
    pub fn is_grouped(&self) -> bool {
        self.grouped
    }

    fn merged(&mut self, field: &str) -> Result<FieldValue, MapError> {
        let base = self.base.value(field)?;
        let mut values: Vec<Scalar> = Vec::new();

        let item = Arc::clone(self.base.item());
        for associate in item.associates() {
            self.associate(associate)
                .get(field)?
                .flatten_into(&mut values);
        }

        Ok(merge_values(base, values))
    }

    fn merged_availability(&mut self) -> FieldValue {
        let base = self.base.availability();
        let out_of_stock = self.base.settings().out_of_stock_label.clone();

        let item = Arc::clone(self.base.item());
        let mut values: Vec<Scalar> = Vec::new();
        for associate in item.associates() {
            self.associate(associate)
                .availability()
                .flatten_into(&mut values);
        }

        merge_availability(base, &values, &out_of_stock)
    }

    fn associate(&mut self, associate: &ItemRef) -> &mut AssociateResolver {
        let settings = self.base.settings();
        self.associates
            .entry(associate.id().to_string())
            .or_insert_with(|| AssociateResolver::new(Arc::clone(associate), Arc::clone(settings)))
    }
}

impl FieldResolver for ConfigurableResolver {
    fn item(&self) -> &ItemRef {
        self.base.item()
    }

    fn before(&mut self) {
        self.grouped = !self.base.settings().split_configurable_products;
        if self.grouped {
            for associate in self.base.item().associates() {
                associate.skip();
            }
        }
    }

    fn get(&mut self, field: &str) -> Result<FieldValue, MapError> {
        if !self.grouped {
            return self.base.value(field);
        }

        if field == "df_availability" {
            Ok(self.merged_availability())
        } else {
            self.merged(field)
        }
    }
}

#[cfg(test)]
#[path = "configurable_test.rs"]
mod tests;
