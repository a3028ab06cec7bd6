//! `feedgen validate`: loads the feed file and builds every store's
//! components without fetching anything.

use std::path::Path;
use std::sync::Arc;

use feedgen_core::{AppConfig, FeedFile};
use feedgen_generator::{Generator, Registry};

/// Initializes a generator per store and collects the failures as
/// `(store, error)` pairs. Component payloads are checked as well as
/// component identifiers.
pub(crate) fn check_components(registry: &Arc<Registry>, feed: &FeedFile) -> Vec<(String, String)> {
    feed.stores
        .iter()
        .filter_map(|store| {
            Generator::for_store(Arc::clone(registry), store)
                .initialize()
                .err()
                .map(|e| (store.name.clone(), e.to_string()))
        })
        .collect()
}

/// # Errors
///
/// Returns an error if the feed file cannot be loaded or fails validation,
/// or if any store references a component that cannot be built.
pub(crate) fn run_validate(config: &AppConfig, config_path: Option<&Path>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or(config.config_path.as_path());
    let feed = feedgen_core::load_feed_config(path)?;

    let registry = Arc::new(Registry::with_output_dir(&config.output_dir));
    let problems = check_components(&registry, &feed);

    for (store, error) in &problems {
        tracing::error!(store = %store, error = %error, "invalid store configuration");
    }

    if !problems.is_empty() {
        anyhow::bail!(
            "{} of {} stores in {} have invalid components",
            problems.len(),
            feed.stores.len(),
            path.display()
        );
    }

    println!("{}: {} stores ok", path.display(), feed.stores.len());
    Ok(())
}
