use std::collections::BTreeMap;

use serde::{de, Deserialize, Deserializer, Serialize};

/// Catalog visibility of a single entity.
///
/// Variants of a configurable product are usually [`Visibility::NotVisible`]:
/// they can only be reached through their parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    NotVisible,
    InCatalog,
    InSearch,
    #[default]
    CatalogAndSearch,
}

impl Visibility {
    /// `true` when the entity has its own storefront page.
    #[must_use]
    pub fn is_visible_in_site(self) -> bool {
        !matches!(self, Visibility::NotVisible)
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::NotVisible => write!(f, "not_visible"),
            Visibility::InCatalog => write!(f, "in_catalog"),
            Visibility::InSearch => write!(f, "in_search"),
            Visibility::CatalogAndSearch => write!(f, "catalog_and_search"),
        }
    }
}

/// A catalog entity (product or variant) as exported from the commerce
/// platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogProduct {
    /// Platform entity ID, kept as a string to avoid precision loss.
    /// Exports may write it as an integer.
    #[serde(deserialize_with = "deserialize_entity_id")]
    pub id: String,
    /// Platform product type, e.g. `"simple"` or `"configurable"`.
    #[serde(default = "default_type_id")]
    pub type_id: String,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    /// Raw HTML description.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url_key: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Catalog price as a decimal string, exactly as stored, e.g. `"12.99"`.
    #[serde(default)]
    pub price: Option<String>,
    /// Applicable tax rate in percent as a decimal string, e.g. `"21"`.
    #[serde(default)]
    pub tax_rate: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    /// Category breadcrumbs, each ordered from the root, e.g.
    /// `[["Drinks", "Juices"], ["Sale"]]`.
    #[serde(default)]
    pub categories: Vec<Vec<String>>,
    /// Any other attribute by code.
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl CatalogProduct {
    #[must_use]
    pub fn is_visible_in_site(&self) -> bool {
        self.visibility.is_visible_in_site()
    }

    #[must_use]
    pub fn attribute(&self, code: &str) -> Option<&serde_json::Value> {
        self.attributes.get(code)
    }

    /// Joins each breadcrumb with `tree_separator` and the breadcrumbs with
    /// `category_separator`. Empty breadcrumbs are skipped; returns `None`
    /// when nothing remains.
    #[must_use]
    pub fn category_breadcrumbs(
        &self,
        tree_separator: &str,
        category_separator: &str,
    ) -> Option<String> {
        let paths: Vec<String> = self
            .categories
            .iter()
            .filter(|path| !path.is_empty())
            .map(|path| path.join(tree_separator))
            .collect();

        if paths.is_empty() {
            None
        } else {
            Some(paths.join(category_separator))
        }
    }
}

struct EntityIdVisitor;

impl de::Visitor<'_> for EntityIdVisitor {
    type Value = String;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("an entity id as a string or integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }
}

/// Reads an entity ID written either as a string or as an integer.
///
/// # Errors
///
/// Returns the deserializer's error for any other value.
pub fn deserialize_entity_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(EntityIdVisitor)
}

/// [`deserialize_entity_id`] applied to every element of a list.
///
/// # Errors
///
/// Returns the deserializer's error if the value is not a list of IDs.
pub fn deserialize_entity_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntityId(String);

    impl<'de> Deserialize<'de> for EntityId {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserialize_entity_id(deserializer).map(EntityId)
        }
    }

    let ids = Vec::<EntityId>::deserialize(deserializer)?;
    Ok(ids.into_iter().map(|EntityId(id)| id).collect())
}

fn default_type_id() -> String {
    "simple".to_string()
}

/// Stock defaults to available when the export omits it.
fn default_in_stock() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn make_product(categories: Vec<Vec<&str>>) -> CatalogProduct {
        CatalogProduct {
            id: "42".to_string(),
            type_id: "simple".to_string(),
            name: "Orange Juice".to_string(),
            sku: None,
            description: None,
            url_key: Some("orange-juice".to_string()),
            image: None,
            price: Some("3.50".to_string()),
            tax_rate: None,
            visibility: Visibility::CatalogAndSearch,
            in_stock: true,
            categories: categories
                .into_iter()
                .map(|p| p.into_iter().map(str::to_string).collect())
                .collect(),
            attributes: BTreeMap::new(),
        }
    }

    #[test]
    fn breadcrumbs_join_levels_and_paths() {
        let product = make_product(vec![vec!["Drinks", "Juices"], vec!["Sale"]]);
        assert_eq!(
            product.category_breadcrumbs(">", "%%").as_deref(),
            Some("Drinks>Juices%%Sale")
        );
    }

    #[test]
    fn breadcrumbs_none_when_no_categories() {
        let product = make_product(vec![vec![]]);
        assert!(product.category_breadcrumbs(">", "%%").is_none());
    }

    #[test]
    fn only_not_visible_is_hidden_from_site() {
        assert!(!Visibility::NotVisible.is_visible_in_site());
        assert!(Visibility::InCatalog.is_visible_in_site());
        assert!(Visibility::InSearch.is_visible_in_site());
        assert!(Visibility::CatalogAndSearch.is_visible_in_site());
    }

    #[test]
    fn integer_ids_read_as_strings() {
        let from_json: CatalogProduct =
            serde_json::from_value(json!({"id": 100, "name": "Tonic"})).unwrap();
        assert_eq!(from_json.id, "100");

        let from_yaml: CatalogProduct = serde_yaml::from_str("id: 1\nname: Tonic\n").unwrap();
        assert_eq!(from_yaml.id, "1");
    }

    #[test]
    fn non_scalar_id_is_rejected() {
        let err = serde_json::from_value::<CatalogProduct>(json!({"id": [1], "name": "Tonic"}))
            .unwrap_err();
        assert!(err.to_string().contains("entity id"));
    }

    #[test]
    fn deserialize_applies_defaults() {
        let product: CatalogProduct =
            serde_json::from_value(json!({"id": "7", "name": "Tonic"})).unwrap();
        assert_eq!(product.type_id, "simple");
        assert!(product.in_stock);
        assert_eq!(product.visibility, Visibility::CatalogAndSearch);
        assert!(product.categories.is_empty());
    }

    #[test]
    fn deserialize_reads_visibility_and_attributes() {
        let product: CatalogProduct = serde_json::from_value(json!({
            "id": "8",
            "type_id": "configurable",
            "name": "Tee",
            "visibility": "not_visible",
            "in_stock": false,
            "attributes": {"color": ["red", "blue"]}
        }))
        .unwrap();
        assert_eq!(product.type_id, "configurable");
        assert!(!product.is_visible_in_site());
        assert!(!product.in_stock);
        assert_eq!(product.attribute("color"), Some(&json!(["red", "blue"])));
    }
}
