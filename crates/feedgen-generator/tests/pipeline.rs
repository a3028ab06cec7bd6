//! End-to-end generator runs through the public API, with test components
//! registered next to the built-ins.

use std::sync::{Arc, Mutex};

use feedgen_core::{parse_feed_config, CatalogProduct, ComponentSpec, FieldValue};
use feedgen_generator::processor::{JsonLinesProcessor, Output};
use feedgen_generator::{
    ComponentKind, FetchError, Fetcher, Generator, GeneratorError, GeneratorObserver, Item,
    ItemRef, MemorySink, PipelineState, ProcessError, Processor, Registry,
};
use serde::Deserialize;
use serde_json::json;

type Seen = Arc<Mutex<Vec<Vec<String>>>>;

fn entity(id: &str) -> CatalogProduct {
    serde_json::from_value(json!({"id": id, "name": format!("Entity {id}")})).unwrap()
}

#[derive(Deserialize)]
struct IdsConfig {
    ids: Vec<String>,
}

/// Returns one fresh item per configured id.
struct IdsFetcher {
    ids: Vec<String>,
}

impl Fetcher for IdsFetcher {
    fn fetch(&mut self) -> Result<Vec<ItemRef>, FetchError> {
        Ok(self
            .ids
            .iter()
            .map(|id| Item::new(entity(id)).into_ref())
            .collect())
    }
}

/// Records the ids it receives, then marks the configured ids as skipped.
struct RecordingProcessor {
    seen: Seen,
    skip: Vec<String>,
}

impl Processor for RecordingProcessor {
    fn process(&mut self, items: &[ItemRef]) -> Result<(), ProcessError> {
        let ids = items.iter().map(|item| item.id().to_string()).collect();
        self.seen.lock().unwrap().push(ids);
        for item in items {
            if self.skip.iter().any(|id| id == item.id()) {
                item.skip();
            }
        }
        Ok(())
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RecordingConfig {
    skip: Vec<String>,
}

fn registry(seen: &Seen, sink: &MemorySink) -> Arc<Registry> {
    let mut registry = Registry::with_builtins();

    registry.fetchers.register("ids", |args| {
        let config: IdsConfig = args.parse()?;
        Ok(Box::new(IdsFetcher { ids: config.ids }))
    });

    let seen = Arc::clone(seen);
    registry.processors.register("recording", move |args| {
        let config: RecordingConfig = args.parse()?;
        Ok(Box::new(RecordingProcessor {
            seen: Arc::clone(&seen),
            skip: config.skip,
        }))
    });

    let sink = sink.clone();
    registry.processors.register("json_memory", move |args| {
        let processor = JsonLinesProcessor::from_args(args, std::path::Path::new("."))?
            .with_output(Output::Memory(sink.clone()));
        Ok(Box::new(processor))
    });

    Arc::new(registry)
}

fn spec(name: &str, config: serde_json::Value) -> ComponentSpec {
    ComponentSpec {
        name: name.to_string(),
        config,
    }
}

fn ids(items: &[ItemRef]) -> Vec<&str> {
    items.iter().map(|item| item.id()).collect()
}

fn document_ids(sink: &MemorySink) -> Vec<String> {
    sink.documents()
        .iter()
        .filter_map(|doc| doc.get("df_id").and_then(FieldValue::as_str).map(String::from))
        .collect()
}

fn catalog() -> serde_json::Value {
    json!({"products": [
        {"id": "10", "name": "Tee", "type_id": "configurable", "associates": ["11", "12"],
         "attributes": {"size": "M"}},
        {"id": "11", "name": "Tee S", "visibility": "not_visible", "in_stock": false,
         "attributes": {"size": "S"}},
        {"id": "12", "name": "Tee L", "visibility": "not_visible", "in_stock": false,
         "attributes": {"size": "L"}},
        {"id": "20", "name": "Mug", "price": "8.5"}
    ]})
}

#[test]
fn fetch_concatenates_in_fetcher_order() {
    let seen = Seen::default();
    let mut generator = Generator::new(
        registry(&seen, &MemorySink::new()),
        vec![
            spec("ids", json!({"ids": ["a", "b"]})),
            spec("ids", json!({"ids": ["c"]})),
        ],
        vec![spec("recording", json!({}))],
    );

    generator.run().unwrap();

    assert_eq!(ids(generator.items()), vec!["a", "b", "c"]);
    assert_eq!(*seen.lock().unwrap(), vec![vec!["a", "b", "c"]]);
}

#[test]
fn fetch_does_not_deduplicate() {
    let mut generator = Generator::new(
        registry(&Seen::default(), &MemorySink::new()),
        vec![
            spec("ids", json!({"ids": ["a"]})),
            spec("ids", json!({"ids": ["a"]})),
        ],
        vec![],
    );

    generator.run().unwrap();

    assert_eq!(ids(generator.items()), vec!["a", "a"]);
}

#[test]
fn fetch_items_resets_the_working_set() {
    let mut generator = Generator::new(
        registry(&Seen::default(), &MemorySink::new()),
        vec![spec("ids", json!({"ids": ["a", "b"]}))],
        vec![],
    );

    generator.initialize().unwrap();
    generator.fetch_items().unwrap();
    generator.fetch_items().unwrap();

    assert_eq!(ids(generator.items()), vec!["a", "b"]);
}

#[test]
fn skip_flags_affect_only_later_processors() {
    let seen = Seen::default();
    let mut generator = Generator::new(
        registry(&seen, &MemorySink::new()),
        vec![spec("ids", json!({"ids": ["x", "y"]}))],
        vec![
            spec("recording", json!({"skip": ["y"]})),
            spec("recording", json!({})),
        ],
    );

    generator.run().unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![vec!["x", "y"], vec!["x"]]);
    assert_eq!(ids(generator.items()), vec!["x", "y"]);
}

#[test]
fn unknown_component_fails_initialize() {
    let seen = Seen::default();
    let mut generator = Generator::new(
        registry(&seen, &MemorySink::new()),
        vec![spec("ids", json!({"ids": ["a"]}))],
        vec![spec("search_upload", json!({}))],
    );

    let err = generator.run().unwrap_err();

    assert!(
        matches!(
            err,
            GeneratorError::ComponentNotFound { kind: ComponentKind::Processor, ref name } if name == "search_upload"
        ),
        "got: {err:?}"
    );
    assert!(generator.items().is_empty());
    assert!(generator.state().fetcher_names().is_empty());
}

#[test]
fn fetcher_failure_names_the_fetcher() {
    let mut generator = Generator::new(
        registry(&Seen::default(), &MemorySink::new()),
        vec![spec("catalog_file", json!({"path": "/nonexistent/catalog.json"}))],
        vec![spec("recording", json!({}))],
    );

    let err = generator.run().unwrap_err();

    assert!(
        matches!(
            err,
            GeneratorError::Fetch { ref fetcher, source: FetchError::Io { .. } } if fetcher == "catalog_file"
        ),
        "got: {err:?}"
    );
}

#[test]
fn grouped_catalog_emits_parents_only() {
    let seen = Seen::default();
    let sink = MemorySink::new();
    let mut generator = Generator::new(
        registry(&seen, &sink),
        vec![spec("inline", catalog())],
        vec![
            spec("json_memory", json!({"fields": ["df_id", "size", "df_availability", "price"]})),
            spec("recording", json!({})),
        ],
    );

    generator.run().unwrap();

    assert_eq!(document_ids(&sink), vec!["10", "20"]);
    let docs = sink.documents();
    assert_eq!(docs[0].get("size"), Some(&FieldValue::from(vec!["M", "S", "L"])));
    assert_eq!(
        docs[0].get("df_availability"),
        Some(&FieldValue::from("out of stock"))
    );
    assert_eq!(
        docs[1].get("price"),
        Some(&FieldValue::from(rust_decimal::Decimal::new(850, 2)))
    );
    // The variants were skipped by the first processor.
    assert_eq!(*seen.lock().unwrap(), vec![vec!["10", "20"]]);
}

#[test]
fn split_catalog_emits_every_entity() {
    let sink = MemorySink::new();
    let mut generator = Generator::new(
        registry(&Seen::default(), &sink),
        vec![spec("inline", catalog())],
        vec![spec(
            "json_memory",
            json!({"fields": ["df_id", "size"], "split_configurable_products": true}),
        )],
    );

    generator.run().unwrap();

    assert_eq!(document_ids(&sink), vec!["10", "11", "12", "20"]);
    assert_eq!(sink.documents()[0].get("size"), Some(&FieldValue::from("M")));
}

#[derive(Clone, Default)]
struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
    inject: Option<Seen>,
}

impl GeneratorObserver for EventLog {
    fn initialized(&mut self, state: &mut PipelineState) {
        self.events.lock().unwrap().push(format!(
            "initialized fetchers={:?} processors={:?}",
            state.fetcher_names(),
            state.processor_names()
        ));
        if let Some(seen) = &self.inject {
            state.add_processor(
                "injected",
                Box::new(RecordingProcessor {
                    seen: Arc::clone(seen),
                    skip: vec![],
                }),
            );
        }
    }

    fn items_fetched(&mut self, state: &PipelineState) {
        self.events
            .lock()
            .unwrap()
            .push(format!("items_fetched {}", state.items().len()));
    }

    fn items_processed(&mut self, state: &PipelineState) {
        self.events
            .lock()
            .unwrap()
            .push(format!("items_processed {}", state.items().len()));
    }
}

#[test]
fn observers_see_each_stage_in_order() {
    let log = EventLog::default();
    let mut generator = Generator::new(
        registry(&Seen::default(), &MemorySink::new()),
        vec![spec("ids", json!({"ids": ["a", "b"]}))],
        vec![spec("recording", json!({}))],
    );
    generator.subscribe(Box::new(log.clone()));

    generator.run().unwrap();

    assert_eq!(
        *log.events.lock().unwrap(),
        vec![
            r#"initialized fetchers=["ids"] processors=["recording"]"#.to_string(),
            "items_fetched 2".to_string(),
            "items_processed 2".to_string(),
        ]
    );
}

#[test]
fn initialized_observer_can_inject_a_processor() {
    let injected = Seen::default();
    let log = EventLog {
        inject: Some(Arc::clone(&injected)),
        ..EventLog::default()
    };
    let mut generator = Generator::new(
        registry(&Seen::default(), &MemorySink::new()),
        vec![spec("ids", json!({"ids": ["a"]}))],
        vec![spec("recording", json!({}))],
    );
    generator.subscribe(Box::new(log));

    generator.run().unwrap();

    assert_eq!(*injected.lock().unwrap(), vec![vec!["a"]]);
    assert_eq!(generator.state().processor_names(), vec!["recording", "injected"]);
}

#[test]
fn generator_from_feed_file_store() {
    let feed = parse_feed_config(
        r"
stores:
  - name: default
    fetchers:
      inline:
        products:
          - id: '1'
            name: Lamp
    processors:
      json_memory:
        fields: [df_id, name]
",
    )
    .unwrap();
    let sink = MemorySink::new();
    let store = feed.store("default").unwrap();
    let mut generator = Generator::for_store(registry(&Seen::default(), &sink), store);

    generator.run().unwrap();

    assert_eq!(document_ids(&sink), vec!["1"]);
    assert_eq!(sink.documents()[0].get("name"), Some(&FieldValue::from("Lamp")));
}
