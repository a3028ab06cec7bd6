use std::str::FromStr;
use std::sync::Arc;

use feedgen_core::{FieldValue, Scalar};
use rust_decimal::{Decimal, RoundingStrategy};

use super::settings::{MapSettings, PriceDisplay};
use super::FieldResolver;
use crate::error::MapError;
use crate::item::ItemRef;

/// Base field resolution for a single catalog entity.
///
/// Values are a pure function of the entity and the settings; `before` is a
/// no-op.
#[derive(Debug, Clone)]
pub struct ProductResolver {
    item: ItemRef,
    settings: Arc<MapSettings>,
}

impl ProductResolver {
    #[must_use]
    pub fn new(item: ItemRef, settings: Arc<MapSettings>) -> Self {
        Self { item, settings }
    }

    #[must_use]
    pub fn settings(&self) -> &Arc<MapSettings> {
        &self.settings
    }

    /// The configured in-stock or out-of-stock label for this entity.
    #[must_use]
    pub fn availability(&self) -> FieldValue {
        let label = if self.item.product().in_stock {
            &self.settings.in_stock_label
        } else {
            &self.settings.out_of_stock_label
        };
        FieldValue::from(label.as_str())
    }

    /// Resolves `field` for the wrapped entity.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] when the entity's price or tax rate is malformed
    /// and `field` is `price`.
    pub fn value(&self, field: &str) -> Result<FieldValue, MapError> {
        let product = self.item.product();

        let value = match field {
            "df_id" => FieldValue::from(product.id.as_str()),
            "name" | "title" => FieldValue::from(product.name.as_str()),
            "description" => product.description.clone().into(),
            "url_key" => product.url_key.clone().into(),
            "image" => product.image.clone().into(),
            "sku" => product.sku.clone().into(),
            "type_id" => FieldValue::from(product.type_id.as_str()),
            "price" => self.price()?,
            "df_availability" | "availability" => self.availability(),
            "categories" | "category_ids" => product
                .category_breadcrumbs(
                    &self.settings.category_tree_separator,
                    &self.settings.category_separator,
                )
                .into(),
            code => self.attribute(code),
        };

        Ok(value)
    }

    fn price(&self) -> Result<FieldValue, MapError> {
        let product = self.item.product();
        let Some(raw) = product.price.as_deref() else {
            return Ok(FieldValue::Null);
        };

        let price = Decimal::from_str(raw.trim())
            .ok()
            .filter(|p| !p.is_sign_negative())
            .ok_or_else(|| MapError::InvalidPrice {
                entity_id: product.id.clone(),
                value: raw.to_string(),
            })?;

        let rate = match product.tax_rate.as_deref() {
            None => Decimal::ZERO,
            Some(raw_rate) => Decimal::from_str(raw_rate.trim())
                .ok()
                .filter(|r| !r.is_sign_negative())
                .ok_or_else(|| MapError::InvalidTaxRate {
                    entity_id: product.id.clone(),
                    value: raw_rate.to_string(),
                })?,
        };

        Ok(FieldValue::from(adjust_price(
            price,
            rate,
            self.settings.catalog_prices_include_tax,
            self.settings.price_display,
        )))
    }

    fn attribute(&self, code: &str) -> FieldValue {
        let Some(raw) = self.item.product().attribute(code) else {
            return FieldValue::Null;
        };

        let value = FieldValue::from(raw);
        if !self.settings.join_multivalue || !matches!(value, FieldValue::List(_)) {
            return value;
        }

        let mut scalars: Vec<Scalar> = Vec::new();
        value.flatten_into(&mut scalars);
        if scalars.is_empty() {
            return FieldValue::Null;
        }

        let joined = scalars
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(&self.settings.value_separator);
        FieldValue::from(joined)
    }
}

impl FieldResolver for ProductResolver {
    fn item(&self) -> &ItemRef {
        &self.item
    }

    fn get(&mut self, field: &str) -> Result<FieldValue, MapError> {
        self.value(field)
    }
}

/// Converts a stored catalog price to the configured display basis and
/// rounds it to two decimal places.
///
/// `rate_percent` is the tax rate in percent (`21` for 21%).
#[must_use]
pub fn adjust_price(
    price: Decimal,
    rate_percent: Decimal,
    stored_with_tax: bool,
    display: PriceDisplay,
) -> Decimal {
    let factor = Decimal::ONE + rate_percent / Decimal::ONE_HUNDRED;

    let adjusted = match (stored_with_tax, display) {
        (true, PriceDisplay::ExcludingTax) => price / factor,
        (false, PriceDisplay::IncludingTax) => price * factor,
        _ => price,
    };

    let mut rounded = adjusted.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::{item, product};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn resolver(product: feedgen_core::CatalogProduct, settings: MapSettings) -> ProductResolver {
        ProductResolver::new(item(product), Arc::new(settings))
    }

    #[test]
    fn identity_fields_come_from_the_entity() {
        let r = resolver(product("7"), MapSettings::default());
        assert_eq!(r.value("df_id").unwrap(), FieldValue::from("7"));
        assert_eq!(r.value("name").unwrap(), FieldValue::from("Product 7"));
        assert_eq!(r.value("title").unwrap(), FieldValue::from("Product 7"));
        assert_eq!(r.value("url_key").unwrap(), FieldValue::from("product-7"));
        assert_eq!(r.value("type_id").unwrap(), FieldValue::from("simple"));
    }

    #[test]
    fn missing_optional_fields_are_null() {
        let mut p = product("7");
        p.description = None;
        p.image = None;
        let r = resolver(p, MapSettings::default());
        assert!(r.value("description").unwrap().is_null());
        assert!(r.value("image").unwrap().is_null());
        assert!(r.value("no_such_attribute").unwrap().is_null());
    }

    #[test]
    fn availability_uses_configured_labels() {
        let settings = MapSettings {
            in_stock_label: "available".to_string(),
            out_of_stock_label: "sold out".to_string(),
            ..MapSettings::default()
        };
        let mut p = product("1");
        assert_eq!(
            resolver(p.clone(), settings.clone()).value("df_availability").unwrap(),
            FieldValue::from("available")
        );
        p.in_stock = false;
        assert_eq!(
            resolver(p, settings).value("availability").unwrap(),
            FieldValue::from("sold out")
        );
    }

    #[test]
    fn categories_join_with_configured_separators() {
        let mut p = product("1");
        p.categories = vec![
            vec!["Drinks".to_string(), "Juices".to_string()],
            vec!["Sale".to_string()],
        ];
        let r = resolver(p.clone(), MapSettings::default());
        assert_eq!(
            r.value("categories").unwrap(),
            FieldValue::from("Drinks>Juices%%Sale")
        );

        let settings = MapSettings {
            category_separator: "|".to_string(),
            category_tree_separator: " / ".to_string(),
            ..MapSettings::default()
        };
        assert_eq!(
            resolver(p, settings).value("category_ids").unwrap(),
            FieldValue::from("Drinks / Juices|Sale")
        );
    }

    #[test]
    fn attributes_keep_lists_unless_joined() {
        let mut p = product("1");
        p.attributes.insert("color".to_string(), json!(["red", "blue"]));
        p.attributes.insert("weight".to_string(), json!(0));

        let r = resolver(p.clone(), MapSettings::default());
        assert_eq!(r.value("color").unwrap(), FieldValue::from(vec!["red", "blue"]));
        assert_eq!(r.value("weight").unwrap(), FieldValue::from(0_i64));

        let joined = resolver(
            p,
            MapSettings {
                join_multivalue: true,
                ..MapSettings::default()
            },
        );
        assert_eq!(joined.value("color").unwrap(), FieldValue::from("red/blue"));
    }

    #[test]
    fn price_is_rounded_to_two_places() {
        let mut p = product("1");
        p.price = Some("12.5".to_string());
        let r = resolver(p, MapSettings::default());
        assert_eq!(r.value("price").unwrap(), FieldValue::from(dec("12.50")));
    }

    #[test]
    fn price_absent_is_null() {
        let mut p = product("1");
        p.price = None;
        assert!(resolver(p, MapSettings::default()).value("price").unwrap().is_null());
    }

    #[test]
    fn price_adds_tax_for_including_display() {
        let mut p = product("1");
        p.price = Some("10.00".to_string());
        p.tax_rate = Some("21".to_string());
        let settings = MapSettings {
            price_display: PriceDisplay::IncludingTax,
            ..MapSettings::default()
        };
        assert_eq!(
            resolver(p, settings).value("price").unwrap(),
            FieldValue::from(dec("12.10"))
        );
    }

    #[test]
    fn price_removes_tax_for_excluding_display() {
        let mut p = product("1");
        p.price = Some("12.10".to_string());
        p.tax_rate = Some("21".to_string());
        let settings = MapSettings {
            catalog_prices_include_tax: true,
            ..MapSettings::default()
        };
        assert_eq!(
            resolver(p, settings).value("price").unwrap(),
            FieldValue::from(dec("10.00"))
        );
    }

    #[test]
    fn price_unchanged_when_basis_matches() {
        assert_eq!(
            adjust_price(dec("9.99"), dec("21"), true, PriceDisplay::IncludingTax),
            dec("9.99")
        );
        assert_eq!(
            adjust_price(dec("9.99"), dec("21"), false, PriceDisplay::ExcludingTax),
            dec("9.99")
        );
    }

    #[test]
    fn price_rounds_half_away_from_zero() {
        assert_eq!(
            adjust_price(dec("0.125"), Decimal::ZERO, false, PriceDisplay::ExcludingTax),
            dec("0.13")
        );
    }

    #[test]
    fn malformed_price_is_a_map_error() {
        let mut p = product("5");
        p.price = Some("twelve".to_string());
        let result = resolver(p, MapSettings::default()).value("price");
        assert!(
            matches!(result, Err(MapError::InvalidPrice { ref entity_id, ref value }) if entity_id == "5" && value == "twelve"),
            "got: {result:?}"
        );
    }

    #[test]
    fn negative_tax_rate_is_a_map_error() {
        let mut p = product("5");
        p.tax_rate = Some("-4".to_string());
        let result = resolver(p, MapSettings::default()).value("price");
        assert!(
            matches!(result, Err(MapError::InvalidTaxRate { .. })),
            "got: {result:?}"
        );
    }

    #[test]
    fn get_is_stable_across_calls() {
        let mut r = resolver(product("1"), MapSettings::default());
        let first = r.get("price").unwrap();
        let second = r.get("price").unwrap();
        assert_eq!(first, second);
    }
}
