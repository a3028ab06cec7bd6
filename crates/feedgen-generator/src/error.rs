use thiserror::Error;

/// Which family a pipeline component belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Fetcher,
    Processor,
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentKind::Fetcher => write!(f, "fetcher"),
            ComponentKind::Processor => write!(f, "processor"),
        }
    }
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("{kind} component not found: {name}")]
    ComponentNotFound { kind: ComponentKind, name: String },

    #[error("invalid configuration for {kind} '{name}': {reason}")]
    InvalidComponentConfig {
        kind: ComponentKind,
        name: String,
        reason: String,
    },

    #[error("fetcher '{fetcher}' failed: {source}")]
    Fetch {
        fetcher: String,
        #[source]
        source: FetchError,
    },

    #[error("processor '{processor}' failed: {source}")]
    Process {
        processor: String,
        #[source]
        source: ProcessError,
    },
}

/// Data-source failures raised while fetching items.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("entity {id} appears more than once in the catalog")]
    DuplicateEntity { id: String },

    #[error("entity {parent} references unknown associate {associate}")]
    UnknownAssociate { parent: String, associate: String },

    #[error("entity {id} lists itself as an associate")]
    SelfAssociate { id: String },

    #[error("associate {associate} of {parent} has associates of its own")]
    NestedAssociates { parent: String, associate: String },
}

/// Field computation failures for malformed entity data.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("entity {entity_id} has an invalid price \"{value}\"")]
    InvalidPrice { entity_id: String, value: String },

    #[error("entity {entity_id} has an invalid tax rate \"{value}\"")]
    InvalidTaxRate { entity_id: String, value: String },
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write document: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to map item {item_id}: {source}")]
    Map {
        item_id: String,
        #[source]
        source: MapError,
    },

    #[error(transparent)]
    Sink(#[from] SinkError),
}
