use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use feedgen_core::FieldValue;
use serde::Deserialize;

use super::clean::strip_html;
use super::sink::{DocumentSink, JsonLinesSink, MemorySink};
use super::{Document, Processor};
use crate::error::{ComponentKind, GeneratorError, MapError, ProcessError, SinkError};
use crate::item::ItemRef;
use crate::map::{FieldResolver, MapSettings, ResolverRegistry};
use crate::registry::ComponentArgs;

const DEFAULT_FIELDS: &[&str] = &[
    "df_id",
    "name",
    "description",
    "url_key",
    "image",
    "price",
    "df_availability",
    "categories",
    "type_id",
];

/// What to do with an item whose fields cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnError {
    #[default]
    Abort,
    SkipItem,
}

/// Where documents go.
#[derive(Debug, Clone)]
pub enum Output {
    Stdout,
    /// Truncated at the start of every `process` call.
    File(PathBuf),
    Memory(MemorySink),
}

#[derive(Debug, Deserialize)]
struct JsonLinesConfig {
    #[serde(default = "default_output")]
    output: String,
    #[serde(default = "default_fields")]
    fields: Vec<String>,
    #[serde(default = "default_strip_html")]
    strip_html: bool,
    #[serde(default)]
    on_error: OnError,
    #[serde(flatten)]
    settings: MapSettings,
}

fn default_output() -> String {
    "-".to_string()
}

fn default_fields() -> Vec<String> {
    DEFAULT_FIELDS.iter().map(ToString::to_string).collect()
}

fn default_strip_html() -> bool {
    true
}

/// Resolves the configured fields of every item and writes one JSON
/// document per line.
///
/// Runs in two passes over the items it receives: every item's resolver
/// gets its `before` hook first, then items still not skipped are mapped.
/// In grouped mode this keeps variants out of the output even when they
/// arrive in the same batch as their parent.
#[derive(Debug)]
pub struct JsonLinesProcessor {
    output: Output,
    fields: Vec<String>,
    strip_html: bool,
    on_error: OnError,
    settings: Arc<MapSettings>,
    resolvers: ResolverRegistry,
}

impl JsonLinesProcessor {
    pub const NAME: &'static str = "json_lines";

    #[must_use]
    pub fn new(output: Output, settings: MapSettings) -> Self {
        Self {
            output,
            fields: default_fields(),
            strip_html: true,
            on_error: OnError::Abort,
            settings: Arc::new(settings),
            resolvers: ResolverRegistry::with_builtins(),
        }
    }

    /// Builds the processor from its configuration payload. A relative
    /// `output` path is resolved against `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidComponentConfig`] if the payload is
    /// malformed or lists no fields.
    pub fn from_args(args: &ComponentArgs, output_dir: &Path) -> Result<Self, GeneratorError> {
        let config: JsonLinesConfig = args.parse()?;

        if config.fields.is_empty() {
            return Err(GeneratorError::InvalidComponentConfig {
                kind: ComponentKind::Processor,
                name: args.name.clone(),
                reason: "fields must not be empty".to_string(),
            });
        }

        let output = match config.output.trim() {
            "-" => Output::Stdout,
            "" => {
                return Err(GeneratorError::InvalidComponentConfig {
                    kind: ComponentKind::Processor,
                    name: args.name.clone(),
                    reason: "output must not be empty".to_string(),
                })
            }
            path => Output::File(output_dir.join(path)),
        };

        Ok(Self::new(output, config.settings)
            .with_fields(config.fields)
            .with_strip_html(config.strip_html)
            .with_on_error(config.on_error))
    }

    #[must_use]
    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_strip_html(mut self, strip_html: bool) -> Self {
        self.strip_html = strip_html;
        self
    }

    #[must_use]
    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.on_error = on_error;
        self
    }

    #[must_use]
    pub fn with_resolvers(mut self, resolvers: ResolverRegistry) -> Self {
        self.resolvers = resolvers;
        self
    }

    #[must_use]
    pub fn output(&self) -> &Output {
        &self.output
    }

    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    #[must_use]
    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    fn open_sink(&self) -> Result<Box<dyn DocumentSink>, SinkError> {
        match &self.output {
            Output::Stdout => Ok(Box::new(JsonLinesSink::new(BufWriter::new(io::stdout())))),
            Output::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                let file = File::create(path)?;
                Ok(Box::new(JsonLinesSink::new(BufWriter::new(file))))
            }
            Output::Memory(sink) => Ok(Box::new(sink.clone())),
        }
    }

    fn document(&self, resolver: &mut dyn FieldResolver) -> Result<Document, MapError> {
        let mut document = Document::new();
        for field in &self.fields {
            let mut value = flatten(resolver.get(field)?);
            if self.strip_html {
                value = value.map_strings(&strip_html);
            }
            document.insert(field.as_str(), value);
        }
        Ok(document)
    }
}

/// Nested sequences become one flat sequence; an empty one is omitted.
fn flatten(value: FieldValue) -> FieldValue {
    if !matches!(value, FieldValue::List(_)) {
        return value;
    }

    let mut scalars = Vec::new();
    value.flatten_into(&mut scalars);
    if scalars.is_empty() {
        FieldValue::Null
    } else {
        FieldValue::List(scalars.into_iter().map(FieldValue::Scalar).collect())
    }
}

impl Processor for JsonLinesProcessor {
    fn process(&mut self, items: &[ItemRef]) -> Result<(), ProcessError> {
        let mut resolvers: Vec<Box<dyn FieldResolver>> = items
            .iter()
            .map(|item| self.resolvers.resolver_for(item, &self.settings))
            .collect();

        for resolver in &mut resolvers {
            resolver.before();
        }

        let mut sink = self.open_sink()?;
        let mut written = 0_usize;
        let mut failed = 0_usize;

        for resolver in &mut resolvers {
            if resolver.item().is_skip() {
                continue;
            }

            match self.document(resolver.as_mut()) {
                Ok(document) => {
                    sink.write(&document)?;
                    written += 1;
                }
                Err(source) => {
                    let item_id = resolver.item().id().to_string();
                    if self.on_error == OnError::Abort {
                        return Err(ProcessError::Map { item_id, source });
                    }
                    tracing::warn!(item = %item_id, error = %source, "skipping item that failed to map");
                    failed += 1;
                }
            }
        }

        sink.finish()?;
        tracing::info!(
            processor = Self::NAME,
            received = items.len(),
            written,
            failed,
            "documents written"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "json_lines_test.rs"]
mod tests;
