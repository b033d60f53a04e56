//! Check command

use crate::app::OutputFormat;
use crate::output;
use anyhow::Result;
use flightrag_core::{GraphStore, Neo4jStore};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

#[derive(Serialize)]
struct CheckReport {
    uri: String,
    connected: bool,
    latency_ms: u64,
    error: Option<String>,
}

pub async fn run(config_path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let config = super::load_config(config_path)?;
    let start = Instant::now();

    let outcome = match Neo4jStore::connect(&config.graph).await {
        Ok(store) => store.ping().await,
        Err(e) => Err(e),
    };

    let report = CheckReport {
        uri: config.graph.uri.clone(),
        connected: outcome.is_ok(),
        latency_ms: start.elapsed().as_millis() as u64,
        error: outcome.as_ref().err().map(|e| e.to_string()),
    };

    output::emit(&report, format, |r| match r.error {
        None => format!("Connected to {} ({} ms)\n", r.uri, r.latency_ms),
        Some(ref e) => format!("Cannot reach {}: {}\n", r.uri, e),
    })?;

    outcome?;
    Ok(())
}
