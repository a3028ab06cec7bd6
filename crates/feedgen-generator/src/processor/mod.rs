//! Item consumers.
//!
//! A processor receives the items that are not skipped at the moment it
//! runs. The built-in [`JsonLinesProcessor`] resolves each item's fields
//! into a [`Document`] and writes it to a [`DocumentSink`].

pub mod clean;
mod json_lines;
mod sink;

pub use json_lines::{JsonLinesProcessor, OnError, Output};
pub use sink::{DocumentSink, JsonLinesSink, MemorySink};

use feedgen_core::FieldValue;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::ProcessError;
use crate::item::ItemRef;

pub trait Processor: Send {
    /// Consumes `items`, which the generator has already filtered for
    /// skipped entries. Field resolvers created here may mark further items
    /// as skipped; that is only visible to later processors.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError`] when an item cannot be mapped or the output
    /// cannot be written.
    fn process(&mut self, items: &[ItemRef]) -> Result<(), ProcessError>;
}

/// Field name to value, in field order. Null values are never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: Vec<(String, FieldValue)>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `field`, or does nothing if `value` is null.
    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        if !value.is_null() {
            self.fields.push((field.into(), value));
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
