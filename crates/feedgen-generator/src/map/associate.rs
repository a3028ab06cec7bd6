use std::sync::Arc;

use feedgen_core::FieldValue;

use super::product::ProductResolver;
use super::settings::MapSettings;
use super::FieldResolver;
use crate::error::MapError;
use crate::item::ItemRef;

/// Fields a variant never contributes to its parent's document.
const SUPPRESSED: &[&str] = &[
    "df_id",
    "name",
    "description",
    "price",
    "image",
    "availability",
    "type_id",
];

/// Field resolution for a variant whose values are folded into its parent.
///
/// Identity and display fields resolve to null so the variant cannot
/// override the parent's. `url_key` is dropped only for variants that are
/// not visible in the storefront on their own.
#[derive(Debug, Clone)]
pub struct AssociateResolver {
    base: ProductResolver,
}

impl AssociateResolver {
    #[must_use]
    pub fn new(item: ItemRef, settings: Arc<MapSettings>) -> Self {
        Self {
            base: ProductResolver::new(item, settings),
        }
    }

    /// The variant's own stock label, bypassing suppression.
    #[must_use]
    pub fn availability(&self) -> FieldValue {
        self.base.availability()
    }

    fn is_suppressed(&self, field: &str) -> bool {
        if field == "url_key" {
            return !self.base.item().product().is_visible_in_site();
        }
        SUPPRESSED.contains(&field)
    }
}

impl FieldResolver for AssociateResolver {
    fn item(&self) -> &ItemRef {
        self.base.item()
    }

    fn get(&mut self, field: &str) -> Result<FieldValue, MapError> {
        if self.is_suppressed(field) {
            return Ok(FieldValue::Null);
        }
        self.base.value(field)
    }
}
