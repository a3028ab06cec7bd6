//! Item sources.
//!
//! A fetcher produces an ordered list of items. Built-ins read catalog
//! exports ([`CatalogFileFetcher`]) or entities embedded in the
//! configuration payload ([`InlineFetcher`]); both share the record
//! linking in [`catalog`].

mod catalog;
mod catalog_file;
mod inline;

pub use catalog::{build_items, CatalogRecord};
pub use catalog_file::CatalogFileFetcher;
pub use inline::InlineFetcher;

use crate::error::FetchError;
use crate::item::ItemRef;

pub trait Fetcher: Send {
    /// Returns items in source order. Must not change the fetcher's
    /// configuration; may perform I/O.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the data source cannot be read or its
    /// contents cannot be linked into items.
    fn fetch(&mut self) -> Result<Vec<ItemRef>, FetchError>;
}
