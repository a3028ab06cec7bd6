use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::catalog::{build_items, CatalogRecord};
use super::Fetcher;
use crate::error::{FetchError, GeneratorError};
use crate::item::ItemRef;
use crate::registry::ComponentArgs;

#[derive(Debug, Deserialize)]
struct CatalogFileConfig {
    path: PathBuf,
}

/// Top-level shape of a catalog export file.
#[derive(Debug, Deserialize)]
struct CatalogExport {
    #[serde(default)]
    products: Vec<CatalogRecord>,
}

/// Reads a JSON or YAML catalog export (`{ products: [...] }`).
///
/// The format is picked by extension: `.yaml`/`.yml` are YAML, anything
/// else is JSON.
#[derive(Debug)]
pub struct CatalogFileFetcher {
    path: PathBuf,
}

impl CatalogFileFetcher {
    pub const NAME: &'static str = "catalog_file";

    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidComponentConfig`] if `path` is missing.
    pub fn from_args(args: &ComponentArgs) -> Result<Self, GeneratorError> {
        let config: CatalogFileConfig = args.parse()?;
        Ok(Self::new(config.path))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_export(&self) -> Result<CatalogExport, FetchError> {
        let display = self.path.display().to_string();
        let content = std::fs::read_to_string(&self.path).map_err(|e| FetchError::Io {
            path: display.clone(),
            source: e,
        })?;

        let is_yaml = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| FetchError::Parse {
                path: display,
                reason: e.to_string(),
            })
        } else {
            serde_json::from_str(&content).map_err(|e| FetchError::Parse {
                path: display,
                reason: e.to_string(),
            })
        }
    }
}

impl Fetcher for CatalogFileFetcher {
    fn fetch(&mut self) -> Result<Vec<ItemRef>, FetchError> {
        let export = self.read_export()?;
        let items = build_items(export.products)?;
        tracing::debug!(
            path = %self.path.display(),
            count = items.len(),
            "read catalog export"
        );
        Ok(items)
    }
}
