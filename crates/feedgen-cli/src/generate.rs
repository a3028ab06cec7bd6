//! `feedgen generate`: one generator run per configured store.
//!
//! A failing store is logged and the next store still runs, unless
//! `FEEDGEN_FAIL_FAST` is set. The command only fails outright when every
//! attempted store failed.

use std::path::Path;
use std::sync::Arc;

use feedgen_core::{AppConfig, FeedFile, StoreConfig};
use feedgen_generator::{Generator, Registry};

/// Result of running a set of stores.
#[derive(Debug, Default)]
pub(crate) struct RunReport {
    pub(crate) succeeded: Vec<String>,
    /// Store name and rendered error.
    pub(crate) failed: Vec<(String, String)>,
}

/// Picks the stores to run: the named one (case-insensitive) or all.
pub(crate) fn select_stores<'a>(
    feed: &'a FeedFile,
    store_filter: Option<&str>,
) -> anyhow::Result<Vec<&'a StoreConfig>> {
    match store_filter {
        Some(name) => {
            let store = feed
                .store(name)
                .ok_or_else(|| anyhow::anyhow!("store '{name}' is not configured"))?;
            Ok(vec![store])
        }
        None => Ok(feed.stores.iter().collect()),
    }
}

/// Runs each store's generator in order.
///
/// # Errors
///
/// Only with `fail_fast`: the first store failure, with the store name as
/// context. Otherwise failures are collected in the report.
pub(crate) fn run_stores(
    registry: &Arc<Registry>,
    stores: &[&StoreConfig],
    fail_fast: bool,
) -> anyhow::Result<RunReport> {
    let mut report = RunReport::default();

    for store in stores {
        tracing::info!(store = %store.name, "generating feed");
        let mut generator = Generator::for_store(Arc::clone(registry), store);

        match generator.run() {
            Ok(()) => {
                tracing::info!(
                    store = %store.name,
                    items = generator.items().len(),
                    "feed generated"
                );
                report.succeeded.push(store.name.clone());
            }
            Err(e) => {
                tracing::error!(store = %store.name, error = %e, "feed generation failed");
                if fail_fast {
                    return Err(anyhow::Error::new(e)
                        .context(format!("feed generation failed for store '{}'", store.name)));
                }
                report.failed.push((store.name.clone(), e.to_string()));
            }
        }
    }

    Ok(report)
}

/// # Errors
///
/// Returns an error if the feed file cannot be loaded, the store filter
/// matches nothing, or no attempted store succeeded.
pub(crate) fn run_generate(
    config: &AppConfig,
    config_path: Option<&Path>,
    store_filter: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let path = config_path.unwrap_or(config.config_path.as_path());
    let feed = feedgen_core::load_feed_config(path)?;
    let stores = select_stores(&feed, store_filter)?;

    if dry_run {
        for store in &stores {
            let fetchers: Vec<&str> = store.fetchers.iter().map(|c| c.name.as_str()).collect();
            let processors: Vec<&str> =
                store.processors.iter().map(|c| c.name.as_str()).collect();
            println!(
                "dry-run: store {} would run fetchers [{}] then processors [{}]",
                store.name,
                fetchers.join(", "),
                processors.join(", ")
            );
        }
        return Ok(());
    }

    let registry = Arc::new(Registry::with_output_dir(&config.output_dir));
    let report = run_stores(&registry, &stores, config.fail_fast)?;
    finish(&report)?;

    println!(
        "generated feeds for {} of {} stores",
        report.succeeded.len(),
        stores.len()
    );
    Ok(())
}

/// Turns a run report into the command outcome.
///
/// # Errors
///
/// Returns an error when stores were attempted and none succeeded.
pub(crate) fn finish(report: &RunReport) -> anyhow::Result<()> {
    if report.failed.is_empty() {
        return Ok(());
    }

    if report.succeeded.is_empty() {
        anyhow::bail!("feed generation failed for all {} stores", report.failed.len());
    }

    let names: Vec<&str> = report.failed.iter().map(|(name, _)| name.as_str()).collect();
    tracing::warn!(
        failed = report.failed.len(),
        succeeded = report.succeeded.len(),
        stores = %names.join(", "),
        "some stores failed"
    );
    Ok(())
}
