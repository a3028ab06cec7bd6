use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::ConfigError;

/// One configured pipeline component: its registry identifier and the
/// payload handed unmodified to its constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSpec {
    pub name: String,
    pub config: serde_json::Value,
}

/// Pipeline definition for a single store.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub name: String,
    /// Fetchers in execution order (YAML mapping order).
    #[serde(deserialize_with = "ordered_components")]
    pub fetchers: Vec<ComponentSpec>,
    /// Processors in execution order (YAML mapping order).
    #[serde(deserialize_with = "ordered_components")]
    pub processors: Vec<ComponentSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedFile {
    pub stores: Vec<StoreConfig>,
}

impl FeedFile {
    /// Finds a store by name, ignoring case the same way duplicate names
    /// are detected.
    #[must_use]
    pub fn store(&self, name: &str) -> Option<&StoreConfig> {
        let key = store_key(name);
        self.stores.iter().find(|s| store_key(&s.name) == key)
    }
}

/// Case-folded form of a store name, used for lookup and uniqueness.
fn store_key(name: &str) -> String {
    name.to_lowercase()
}

/// Load and validate the feed configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_feed_config(path: &Path) -> Result<FeedFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FeedFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_feed_config(&content)
}

/// Parse and validate feed configuration YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_feed_config(content: &str) -> Result<FeedFile, ConfigError> {
    let feed: FeedFile = serde_yaml::from_str(content)?;
    validate_feed(&feed)?;
    Ok(feed)
}

fn validate_feed(feed: &FeedFile) -> Result<(), ConfigError> {
    if feed.stores.is_empty() {
        return Err(ConfigError::Validation(
            "at least one store must be configured".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();

    for store in &feed.stores {
        if store.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(store_key(&store.name)) {
            return Err(ConfigError::Validation(format!(
                "duplicate store name: '{}'",
                store.name
            )));
        }

        if store.fetchers.is_empty() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has no fetchers",
                store.name
            )));
        }

        if store.processors.is_empty() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has no processors",
                store.name
            )));
        }

        for (kind, components) in [("fetcher", &store.fetchers), ("processor", &store.processors)] {
            let mut seen = HashSet::new();
            for component in components {
                if !seen.insert(component.name.as_str()) {
                    return Err(ConfigError::Validation(format!(
                        "store '{}' lists {kind} '{}' more than once",
                        store.name, component.name
                    )));
                }
            }
        }
    }

    Ok(())
}

/// Deserializes a `{ id: payload }` mapping into a vector, keeping the
/// document order.
fn ordered_components<'de, D>(deserializer: D) -> Result<Vec<ComponentSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ComponentsVisitor;

    impl<'de> Visitor<'de> for ComponentsVisitor {
        type Value = Vec<ComponentSpec>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of component identifiers to configuration")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut components = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, config)) = map.next_entry::<String, serde_json::Value>()? {
                components.push(ComponentSpec { name, config });
            }
            Ok(components)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_map(ComponentsVisitor)
}

#[cfg(test)]
#[path = "feed_config_test.rs"]
mod tests;
