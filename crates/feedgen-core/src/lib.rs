//! Shared domain types for the catalog feed generator.
//!
//! Holds the catalog entity model consumed by field resolvers, the field
//! value model produced by them, and both configuration layers: the
//! process-level [`AppConfig`] read from the environment and the YAML feed
//! file describing each store's fetchers and processors.

mod app_config;
mod config;
pub mod feed_config;
pub mod products;
pub mod value;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use feed_config::{load_feed_config, parse_feed_config, ComponentSpec, FeedFile, StoreConfig};
pub use products::{deserialize_entity_id, deserialize_entity_ids, CatalogProduct, Visibility};
pub use value::{FieldValue, Scalar};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read feed config {path}: {source}")]
    FeedFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse feed config: {0}")]
    FeedFileParse(#[from] serde_yaml::Error),

    #[error("feed config validation failed: {0}")]
    Validation(String),
}
