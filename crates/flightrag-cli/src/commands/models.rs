//! Models command

use crate::app::OutputFormat;
use crate::output;
use anyhow::Result;
use flightrag_core::embeddings::EmbeddingModel;
use flightrag_core::llm::{ModelSpec, MODELS};
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

#[derive(Serialize)]
struct EmbeddingRow {
    key: &'static str,
    model: &'static str,
    dimensions: usize,
    index: String,
}

#[derive(Serialize)]
struct ModelsReport {
    default_model: String,
    default_embedding_model: String,
    llm: &'static [ModelSpec],
    embedding: Vec<EmbeddingRow>,
}

pub fn run(config_path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let config = super::load_config(config_path)?;

    let report = ModelsReport {
        default_model: config.llm.default_model,
        default_embedding_model: config.embedding.default_model,
        llm: MODELS,
        embedding: EmbeddingModel::ALL
            .iter()
            .map(|model| EmbeddingRow {
                key: model.key(),
                model: model.model_id(),
                dimensions: model.dimensions(),
                index: model.index_name(),
            })
            .collect(),
    };

    output::emit(&report, format, render)
}

fn render(report: &ModelsReport) -> String {
    let mark = |key: &str, default: &str| if key == default { "*" } else { " " };

    let mut out = String::from("Generation models:\n");
    for spec in report.llm {
        let _ = writeln!(
            out,
            " {} {:<8} {:<36} {:?}",
            mark(spec.key, &report.default_model),
            spec.key,
            spec.name,
            spec.style
        );
    }
    out.push_str("\nEmbedding models:\n");
    for row in &report.embedding {
        let _ = writeln!(
            out,
            " {} {:<8} {:<46} {:>4}  {}",
            mark(row.key, &report.default_embedding_model),
            row.key,
            row.model,
            row.dimensions,
            row.index
        );
    }
    out
}
