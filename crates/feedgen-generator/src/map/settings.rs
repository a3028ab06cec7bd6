use serde::Deserialize;

/// How prices are presented in documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceDisplay {
    #[default]
    ExcludingTax,
    IncludingTax,
}

/// Resolver policy, read from a processor's configuration payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Emit variants as their own documents instead of folding them into
    /// their configurable parent.
    pub split_configurable_products: bool,
    pub in_stock_label: String,
    pub out_of_stock_label: String,
    /// Between breadcrumbs, e.g. `Drinks>Juices%%Sale`.
    pub category_separator: String,
    /// Between levels of one breadcrumb.
    pub category_tree_separator: String,
    /// Joins list-valued attributes when `join_multivalue` is set.
    pub value_separator: String,
    pub join_multivalue: bool,
    /// Whether catalog prices are stored with tax included.
    pub catalog_prices_include_tax: bool,
    pub price_display: PriceDisplay,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            split_configurable_products: false,
            in_stock_label: "in stock".to_string(),
            out_of_stock_label: "out of stock".to_string(),
            category_separator: "%%".to_string(),
            category_tree_separator: ">".to_string(),
            value_separator: "/".to_string(),
            join_multivalue: false,
            catalog_prices_include_tax: false,
            price_display: PriceDisplay::ExcludingTax,
        }
    }
}
