//! Simulation engine binary for Homestead.
//!
//! Wires the material catalog and the production activities into a
//! multi-day simulation loop. Loads the run configuration, constructs
//! one activity per configured output good, then threads the stock
//! snapshot through every activity once per day -- retaining every
//! day's snapshot so the full history can be emitted at the end.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load run configuration from `homestead-config.yaml`
//!    (or the path given as the first CLI argument)
//! 3. Load the material catalog
//! 4. Construct the configured activities
//! 5. Run the day loop
//! 6. Print the stock history as JSON on stdout

mod config;

use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use homestead_catalog::MaterialCatalog;
use homestead_production::Activity;
use homestead_types::Stock;

use crate::config::RunConfig;

/// Default run configuration path, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "homestead-config.yaml";

/// Application entry point for the simulation engine.
///
/// # Errors
///
/// Returns an error if configuration or catalog loading fails, if an
/// activity cannot be constructed, or if any day's production fails.
fn main() -> anyhow::Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("homestead-engine starting");

    // 2. Load run configuration.
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from(DEFAULT_CONFIG_PATH));
    let config = RunConfig::from_file(Path::new(&config_path))
        .with_context(|| format!("loading run config from {config_path}"))?;
    info!(
        catalog_path = config.catalog_path,
        days = config.days,
        labor = %config.labor,
        land = %config.land,
        activity_count = config.activities.len(),
        "configuration loaded"
    );

    // 3. Load the material catalog.
    let catalog = MaterialCatalog::from_file(Path::new(&config.catalog_path))
        .with_context(|| format!("loading material catalog from {}", config.catalog_path))?;
    info!(records = catalog.len(), "material catalog loaded");

    if config.activities.is_empty() {
        warn!("no activities configured; nothing to simulate");
    }

    // 4. Construct one activity per configured output good, in the
    //    configured chain order.
    let mut activities = Vec::with_capacity(config.activities.len());
    for good in &config.activities {
        let activity = Activity::new(good, &catalog)
            .with_context(|| format!("constructing activity for '{good}'"))?;
        info!(activity = %good, configuration = %activity, "activity constructed");
        activities.push(activity);
    }

    // 5. Day loop. Each day threads the snapshot through every activity
    //    in order; every snapshot is retained (perform never mutates its
    //    input, so earlier snapshots stay valid).
    let mut current: Stock = config.initial_stocks.clone().into();
    let mut history = vec![current.clone()];
    for day in 1..=config.days {
        for activity in &activities {
            current = activity
                .perform(config.labor, config.land, &current)
                .with_context(|| {
                    format!("day {day}: performing '{}'", activity.output_good())
                })?;
        }
        info!(
            day,
            stock = serde_json::to_string(&current).unwrap_or_default(),
            "day complete"
        );
        history.push(current.clone());
    }

    // 6. Emit the full history as JSON on stdout: one snapshot per day,
    //    starting with the initial stocks.
    let rendered =
        serde_json::to_string_pretty(&history).context("serializing stock history")?;
    println!("{rendered}");

    info!(
        days_run = config.days,
        snapshots = history.len(),
        "simulation complete"
    );
    Ok(())
}
