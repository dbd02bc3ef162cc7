// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inventory Report
//!
//! Loads an inventory snapshot (JSON) into the in-memory repository and
//! prints the appliance list as JSON, optionally filtered by a search query.
//!
//! Run with: cargo run --bin inventory-report -- <snapshot.json> [query]
//!
//! Environment:
//! - `INVENTORY_UNASSIGNED_HOUSING` / `INVENTORY_UNASSIGNED_CABINET`
//! - `INVENTORY_SEARCH_CASE_SENSITIVE=1` for case-sensitive matching
//! - `RUST_LOG` for log filtering (logs go to stderr)

use anyhow::{bail, Context, Result};
use cim_inventory::{
    DevicesManager, InMemoryRepository, InventoryConfig, RepositoryDevicesManager, SearchQuery,
    Snapshot,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: inventory-report <snapshot.json> [query]");
    };
    let query = args.next();

    let config = InventoryConfig::from_env();
    info!(
        housing = %config.unassigned_housing_name,
        cabinet = %config.unassigned_cabinet_name,
        "Configuration loaded"
    );

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read snapshot {path}"))?;
    let snapshot: Snapshot =
        serde_json::from_str(&raw).with_context(|| format!("Invalid snapshot {path}"))?;
    let repo = InMemoryRepository::from_snapshot(snapshot).context("Snapshot rejected")?;

    let manager = RepositoryDevicesManager::new(repo, config);
    let appliances = manager
        .get_appliances()
        .await
        .context("Failed to build appliances")?;

    let appliances = match query {
        Some(text) => {
            let case_sensitive = std::env::var("INVENTORY_SEARCH_CASE_SENSITIVE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false);
            let search = SearchQuery::new(&text).case_sensitive(case_sensitive);
            let found = search.filter(&appliances);
            if found.is_empty() {
                warn!(query = %text, "No appliances matched");
            }
            found
        }
        None => appliances,
    };

    info!(count = appliances.len(), "Report ready");
    println!("{}", serde_json::to_string_pretty(&appliances)?);
    Ok(())
}
