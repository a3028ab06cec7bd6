//! Fixtures shared by unit tests across modules.

use std::collections::BTreeMap;
use std::sync::Arc;

use feedgen_core::{CatalogProduct, Visibility};

use crate::item::{Item, ItemRef};

pub(crate) fn product(id: &str) -> CatalogProduct {
    CatalogProduct {
        id: id.to_string(),
        type_id: "simple".to_string(),
        name: format!("Product {id}"),
        sku: Some(format!("SKU-{id}")),
        description: Some(format!("<p>Description of {id}</p>")),
        url_key: Some(format!("product-{id}")),
        image: Some(format!("https://cdn.example.com/{id}.jpg")),
        price: Some("10.00".to_string()),
        tax_rate: None,
        visibility: Visibility::CatalogAndSearch,
        in_stock: true,
        categories: vec![],
        attributes: BTreeMap::new(),
    }
}

pub(crate) fn variant(id: &str) -> CatalogProduct {
    CatalogProduct {
        visibility: Visibility::NotVisible,
        ..product(id)
    }
}

pub(crate) fn item(product: CatalogProduct) -> ItemRef {
    Item::new(product).into_ref()
}

pub(crate) fn configurable(id: &str, variants: Vec<CatalogProduct>) -> (ItemRef, Vec<ItemRef>) {
    let associates: Vec<ItemRef> = variants.into_iter().map(item).collect();
    let parent = CatalogProduct {
        type_id: "configurable".to_string(),
        ..product(id)
    };
    let parent = Item::with_associates(parent, associates.iter().map(Arc::clone).collect())
        .expect("valid associates")
        .into_ref();
    (parent, associates)
}
