//! Terminal output formatter

use flightrag_core::{EntitySet, PipelineOutcome};
use std::fmt::Write;

pub struct AnswerView {
    pub show_context: bool,
    pub show_prompt: bool,
}

pub fn format_outcome(outcome: &PipelineOutcome, view: &AnswerView) -> String {
    let mut output = String::new();

    if view.show_context {
        let _ = writeln!(output, "Intent: {}", outcome.intent);
        let filters = outcome.entities.active_filters();
        if !filters.is_empty() {
            let _ = writeln!(output, "Filters: {}", filters.join(", "));
        }
        let _ = writeln!(output, "\n{}\n", outcome.context);
    }
    if view.show_prompt {
        let _ = writeln!(output, "{}\n", outcome.prompt);
    }

    match outcome.answer {
        Some(ref answer) => {
            let _ = writeln!(output, "{}", answer.trim());
        }
        None => {
            let _ = writeln!(
                output,
                "No answer from {}: {}",
                outcome.response.model,
                outcome.response.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    if let Some(ref name) = outcome.response.model_name {
        let _ = writeln!(output, "\n[{} in {:.2}s]", name, outcome.response.latency);
    }
    output
}

pub fn format_entities(entities: &EntitySet) -> String {
    let rows: [(&str, Option<String>); 12] = [
        ("flight_no", entities.flight_no.clone()),
        ("departure_airport", entities.departure_airport.clone()),
        ("arrival_airport", entities.arrival_airport.clone()),
        ("route", entities.route.clone()),
        ("passenger_class", entities.passenger_class.clone()),
        ("generation", entities.generation.clone()),
        ("fleet_type", entities.fleet_type.clone()),
        ("date", entities.date.map(|d| d.to_string())),
        ("sort_order", entities.sort_order.map(|o| o.as_cypher().to_string())),
        ("sort_attribute", entities.sort_attribute.map(|a| a.to_string())),
        ("limit", entities.limit.map(|n| n.to_string())),
        ("number_of_legs", entities.number_of_legs.map(|n| n.to_string())),
    ];

    let mut output = String::new();
    for (name, value) in rows {
        if let Some(value) = value {
            let _ = writeln!(output, "{:<18} {}", name, value);
        }
    }
    if output.is_empty() {
        output.push_str("No entities found\n");
    }
    output
}
