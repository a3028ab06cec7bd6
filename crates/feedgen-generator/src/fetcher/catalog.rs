//! Linking flat catalog records into items.
//!
//! Exports list every entity once. A parent names its variants by ID in
//! `associates`; the variant is still returned at top level and the parent
//! holds a handle to that same item.

use std::collections::HashMap;

use feedgen_core::CatalogProduct;
use serde::Deserialize;

use crate::error::FetchError;
use crate::item::{Item, ItemRef};

/// One exported entity plus the IDs of its associated variants.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecord {
    #[serde(flatten)]
    pub product: CatalogProduct,
    #[serde(default, deserialize_with = "feedgen_core::deserialize_entity_ids")]
    pub associates: Vec<String>,
}

/// Builds items from `records`, preserving record order.
///
/// # Errors
///
/// Returns [`FetchError::DuplicateEntity`] when two records share an ID,
/// [`FetchError::SelfAssociate`], [`FetchError::UnknownAssociate`] or
/// [`FetchError::NestedAssociates`] when associate links are invalid.
pub fn build_items(records: Vec<CatalogRecord>) -> Result<Vec<ItemRef>, FetchError> {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
        if index.insert(record.product.id.clone(), position).is_some() {
            return Err(FetchError::DuplicateEntity {
                id: record.product.id.clone(),
            });
        }
    }

    for record in &records {
        for associate_id in &record.associates {
            if *associate_id == record.product.id {
                return Err(FetchError::SelfAssociate {
                    id: record.product.id.clone(),
                });
            }
            let target = index
                .get(associate_id)
                .ok_or_else(|| FetchError::UnknownAssociate {
                    parent: record.product.id.clone(),
                    associate: associate_id.clone(),
                })?;
            if !records[*target].associates.is_empty() {
                return Err(FetchError::NestedAssociates {
                    parent: record.product.id.clone(),
                    associate: associate_id.clone(),
                });
            }
        }
    }

    // Leaves first so parents can take handles to them.
    let mut slots: Vec<Option<ItemRef>> = vec![None; records.len()];
    let mut parents: Vec<(usize, CatalogProduct, Vec<String>)> = Vec::new();

    for (position, record) in records.into_iter().enumerate() {
        if record.associates.is_empty() {
            slots[position] = Some(Item::new(record.product).into_ref());
        } else {
            parents.push((position, record.product, record.associates));
        }
    }

    for (position, product, associate_ids) in parents {
        let associates = associate_ids
            .iter()
            .map(|id| {
                index
                    .get(id)
                    .and_then(|target| slots[*target].clone())
                    .ok_or_else(|| FetchError::UnknownAssociate {
                        parent: product.id.clone(),
                        associate: id.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        slots[position] = Some(Item::with_associates(product, associates)?.into_ref());
    }

    Ok(slots.into_iter().flatten().collect())
}
