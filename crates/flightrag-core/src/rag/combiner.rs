//! Merge structured and semantic retrieval into one grounding context
//!
//! Structured rows are taken first so that a journey returned by both paths
//! keeps its structured version. Rendering branches on the intent: listing
//! questions get three sections of journeys and a summary, statistic
//! questions get the aggregate row, the filters it was computed under, and a
//! few related examples.

use crate::graph::{JourneyRecord, Provenance, StatisticsRecord};
use crate::preprocess::{EntitySet, Intent};
use crate::retrieval::QueryResult;
use crate::embeddings::SearchResult;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Write;

const RULE: &str = "================================================================================";
const THIN_RULE: &str = "--------------------------------------------------------------------------------";

/// Records shown per section in listing mode
const LISTED_PER_SECTION: usize = 5;

/// Related semantic examples shown under a statistic
const STATISTIC_EXAMPLES: usize = 3;

/// Deduplicated evidence plus its rendered text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedContext {
    pub intent: Intent,
    pub structured: Vec<JourneyRecord>,
    pub semantic: Vec<JourneyRecord>,
    pub unique: Vec<JourneyRecord>,
    pub statistics: Option<StatisticsRecord>,
    pub filters: Vec<String>,
    pub total_count: usize,
    pub avg_delay: Option<f64>,
    pub avg_food_score: Option<f64>,
    pub formatted: String,
}

/// Merges the two retrieval paths
#[derive(Debug, Clone, Copy)]
pub struct ResultCombiner {
    max_per_source: usize,
}

impl Default for ResultCombiner {
    fn default() -> Self {
        Self { max_per_source: 10 }
    }
}

impl ResultCombiner {
    pub fn new(max_per_source: usize) -> Self {
        Self { max_per_source }
    }

    /// Combine the outputs of both retrieval stages
    pub fn combine(
        &self,
        structured: &QueryResult,
        semantic: &SearchResult,
        entities: &EntitySet,
    ) -> CombinedContext {
        self.combine_records(
            structured.intent,
            &structured.journeys,
            &semantic.records,
            structured.statistics.as_ref(),
            entities.active_filters(),
        )
    }

    pub fn combine_records(
        &self,
        intent: Intent,
        structured: &[JourneyRecord],
        semantic: &[JourneyRecord],
        statistics: Option<&StatisticsRecord>,
        filters: Vec<String>,
    ) -> CombinedContext {
        let structured: Vec<JourneyRecord> =
            structured.iter().take(self.max_per_source).cloned().collect();
        let semantic: Vec<JourneyRecord> =
            semantic.iter().take(self.max_per_source).cloned().collect();

        let unique = merge_unique(&structured, &semantic);
        let avg_delay = mean(unique.iter().map(|r| r.arrival_delay_minutes));
        let avg_food_score = mean(unique.iter().map(|r| r.food_satisfaction_score));

        let mut context = CombinedContext {
            intent,
            total_count: unique.len(),
            structured,
            semantic,
            unique,
            statistics: statistics.cloned(),
            filters,
            avg_delay,
            avg_food_score,
            formatted: String::new(),
        };
        context.formatted = if intent.is_statistic() {
            render_statistics(&context)
        } else {
            render_listing(&context)
        };
        context
    }
}

/// Union of both lists keyed by journey id, structured rows first
pub fn merge_unique(structured: &[JourneyRecord], semantic: &[JourneyRecord]) -> Vec<JourneyRecord> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut unique = Vec::with_capacity(structured.len() + semantic.len());

    let tagged = structured
        .iter()
        .map(|r| (r, Provenance::Structured))
        .chain(semantic.iter().map(|r| (r, Provenance::Semantic)));

    for (record, source) in tagged {
        if record.feedback_id.is_empty() || !seen.insert(record.feedback_id.as_str()) {
            continue;
        }
        unique.push(record.clone().with_provenance(source));
    }
    unique
}

/// Arithmetic mean of the present values, `None` when there are none
pub fn mean(values: impl Iterator<Item = Option<i64>>) -> Option<f64> {
    let (sum, n) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v as f64, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn or_na<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "N/A".to_string())
}

fn push_record(out: &mut String, record: &JourneyRecord, index: usize, with_score: bool) {
    let _ = writeln!(out, "\nResult {}:", index);
    let _ = writeln!(out, "  Journey ID: {}", record.feedback_id);
    let _ = writeln!(
        out,
        "  Passenger Class: {}",
        record.passenger_class.as_deref().unwrap_or("Unknown")
    );
    let _ = writeln!(out, "  Food Satisfaction: {}/5", or_na(&record.food_satisfaction_score));
    let _ = writeln!(out, "  Arrival Delay: {} minutes", or_na(&record.arrival_delay_minutes));
    let _ = writeln!(out, "  Distance: {} miles", or_na(&record.actual_flown_miles));
    let _ = writeln!(out, "  Number of Legs: {}", or_na(&record.number_of_legs));
    if with_score {
        if let Some(score) = record.score {
            let _ = writeln!(out, "  Similarity Score: {:.3}", score);
        }
    }
}

fn render_listing(ctx: &CombinedContext) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "KNOWLEDGE GRAPH DATA (Intent: {}):", ctx.intent);
    out.push_str(RULE);
    out.push('\n');

    if ctx.structured.is_empty() {
        out.push_str("\n1. EXACT MATCHES: No exact matches found.\n");
    } else {
        let _ = writeln!(
            out,
            "\n1. EXACT MATCHES from database query ({} results):",
            ctx.structured.len()
        );
        out.push_str(THIN_RULE);
        out.push('\n');
        for (i, record) in ctx.structured.iter().take(LISTED_PER_SECTION).enumerate() {
            push_record(&mut out, record, i + 1, false);
        }
    }

    if ctx.semantic.is_empty() {
        out.push_str("\n2. SEMANTIC MATCHES: No similar journeys found.\n");
    } else {
        let _ = writeln!(
            out,
            "\n2. SEMANTIC MATCHES from AI similarity search ({} results):",
            ctx.semantic.len()
        );
        out.push_str(THIN_RULE);
        out.push('\n');
        for (i, record) in ctx.semantic.iter().take(LISTED_PER_SECTION).enumerate() {
            push_record(&mut out, record, i + 1, true);
        }
    }

    out.push_str("\n3. SUMMARY:\n");
    out.push_str(THIN_RULE);
    out.push('\n');
    let _ = writeln!(out, "Total unique journeys found: {}", ctx.total_count);
    let _ = writeln!(out, "From exact database queries: {}", ctx.structured.len());
    let _ = writeln!(out, "From semantic similarity: {}", ctx.semantic.len());
    if let Some(avg) = ctx.avg_delay {
        let _ = writeln!(out, "Average arrival delay: {:.1} minutes", avg);
    }
    if let Some(avg) = ctx.avg_food_score {
        let _ = writeln!(out, "Average food satisfaction: {:.1}/5", avg);
    }
    out.push_str(RULE);
    out
}

fn render_statistics(ctx: &CombinedContext) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "KNOWLEDGE GRAPH DATA (Intent: {}):", ctx.intent);
    out.push_str(RULE);
    out.push('\n');

    out.push_str("\n1. STATISTICAL RESULT from database query:\n");
    out.push_str(THIN_RULE);
    out.push('\n');
    match ctx.statistics {
        Some(ref stats) => {
            let fixed = |v: Option<f64>| {
                v.map(|v| format!("{:.2}", v))
                    .unwrap_or_else(|| "N/A".to_string())
            };
            let _ = writeln!(out, "Total Journeys: {}", stats.total_journeys);
            let _ = writeln!(out, "Average Delay: {} minutes", fixed(stats.avg_delay));
            let _ = writeln!(out, "Average Food Satisfaction: {}/5", fixed(stats.avg_food_score));
            let _ = writeln!(out, "Average Distance: {} miles", fixed(stats.avg_distance));
            let _ = writeln!(
                out,
                "Delay Range: {} to {} minutes",
                or_na(&stats.min_delay),
                or_na(&stats.max_delay)
            );
        }
        None => out.push_str("No aggregate could be computed for this question.\n"),
    }

    out.push_str("\nFilters applied:\n");
    if ctx.filters.is_empty() {
        out.push_str("  - None (all journeys)\n");
    } else {
        for filter in &ctx.filters {
            let _ = writeln!(out, "  - {}", filter);
        }
    }

    if !ctx.semantic.is_empty() {
        let shown = ctx.semantic.len().min(STATISTIC_EXAMPLES);
        let _ = writeln!(
            out,
            "\n2. RELATED EXAMPLES from AI similarity search ({} shown):",
            shown
        );
        out.push_str(THIN_RULE);
        out.push('\n');
        for (i, record) in ctx.semantic.iter().take(STATISTIC_EXAMPLES).enumerate() {
            push_record(&mut out, record, i + 1, true);
        }
    }

    out.push_str(RULE);
    out
}
