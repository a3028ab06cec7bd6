//! Component resolution: maps configured identifiers to constructors.
//!
//! The registry is populated up front (built-ins plus anything the caller
//! registers); a generator then creates one instance per configured
//! identifier. An identifier with no registered constructor is a
//! configuration error and fails [`Generator::initialize`](crate::Generator::initialize).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::{ComponentKind, GeneratorError};
use crate::fetcher::{CatalogFileFetcher, Fetcher, InlineFetcher};
use crate::processor::{JsonLinesProcessor, Processor};

/// Everything a component constructor receives.
#[derive(Debug, Clone)]
pub struct ComponentArgs {
    pub kind: ComponentKind,
    /// Configured identifier, e.g. `"catalog_file"`.
    pub name: String,
    /// Configuration payload, passed through unmodified.
    pub data: serde_json::Value,
}

impl ComponentArgs {
    /// Deserializes the payload into the component's typed configuration.
    /// A missing (`null`) payload is read as an empty mapping so that
    /// all-default configurations need no body.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidComponentConfig`] if the payload does
    /// not match `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, GeneratorError> {
        let data = if self.data.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            self.data.clone()
        };

        serde_json::from_value(data).map_err(|e| GeneratorError::InvalidComponentConfig {
            kind: self.kind,
            name: self.name.clone(),
            reason: e.to_string(),
        })
    }
}

type Constructor<T> = Box<dyn Fn(&ComponentArgs) -> Result<Box<T>, GeneratorError> + Send + Sync>;

/// String-keyed constructors for one component family.
pub struct ComponentRegistry<T: ?Sized> {
    kind: ComponentKind,
    constructors: HashMap<String, Constructor<T>>,
}

impl<T: ?Sized> ComponentRegistry<T> {
    #[must_use]
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            constructors: HashMap::new(),
        }
    }

    /// Registers `constructor` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(&ComponentArgs) -> Result<Box<T>, GeneratorError> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Box::new(constructor));
        self
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered identifiers, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Instantiates the component registered as `name` with `data`.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::ComponentNotFound`] for an unknown
    /// identifier, or whatever the constructor returns.
    pub fn create(&self, name: &str, data: serde_json::Value) -> Result<Box<T>, GeneratorError> {
        let constructor =
            self.constructors
                .get(name)
                .ok_or_else(|| GeneratorError::ComponentNotFound {
                    kind: self.kind,
                    name: name.to_string(),
                })?;

        tracing::debug!(kind = %self.kind, component = name, "creating component");

        constructor(&ComponentArgs {
            kind: self.kind,
            name: name.to_string(),
            data,
        })
    }
}

impl<T: ?Sized> std::fmt::Debug for ComponentRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("kind", &self.kind)
            .field("names", &self.names())
            .finish()
    }
}

pub type FetcherRegistry = ComponentRegistry<dyn Fetcher>;
pub type ProcessorRegistry = ComponentRegistry<dyn Processor>;

/// Fetcher and processor registries used by a [`Generator`](crate::Generator).
#[derive(Debug)]
pub struct Registry {
    pub fetchers: FetcherRegistry,
    pub processors: ProcessorRegistry,
}

impl Registry {
    /// A registry with nothing registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            fetchers: ComponentRegistry::new(ComponentKind::Fetcher),
            processors: ComponentRegistry::new(ComponentKind::Processor),
        }
    }

    /// Built-in components; relative output paths resolve against the
    /// working directory.
    #[must_use]
    pub fn with_builtins() -> Self {
        Self::with_output_dir(Path::new("."))
    }

    /// Built-in components; relative output paths resolve against
    /// `output_dir`.
    #[must_use]
    pub fn with_output_dir(output_dir: &Path) -> Self {
        let mut registry = Self::empty();

        registry
            .fetchers
            .register(CatalogFileFetcher::NAME, |args| {
                Ok(Box::new(CatalogFileFetcher::from_args(args)?))
            })
            .register(InlineFetcher::NAME, |args| {
                Ok(Box::new(InlineFetcher::from_args(args)?))
            });

        let output_dir: PathBuf = output_dir.to_path_buf();
        registry
            .processors
            .register(JsonLinesProcessor::NAME, move |args| {
                Ok(Box::new(JsonLinesProcessor::from_args(args, &output_dir)?))
            });

        registry
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
