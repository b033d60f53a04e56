//! Structured retrieval: bind entities into an intent template and run it

use super::templates::{AirportFilter, Template};
use crate::config::RetrievalConfig;
use crate::graph::{GraphStore, JourneyRecord, ParamValue, Statement, StatisticsRecord};
use crate::preprocess::{EntitySet, Intent};
use serde::Serialize;
use std::fmt::Write;
use std::sync::Arc;
use std::time::Instant;

/// Outcome of one structured query; failures are carried in `error`
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub intent: Intent,
    pub statement: Statement,
    pub journeys: Vec<JourneyRecord>,
    pub statistics: Option<StatisticsRecord>,
    pub count: usize,
    pub error: Option<String>,
}

impl QueryResult {
    fn failed(intent: Intent, statement: Statement, error: String) -> Self {
        Self {
            intent,
            statement,
            journeys: Vec::new(),
            statistics: None,
            count: 0,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Render a structured-only context block
    pub fn format_for_llm(&self) -> String {
        if let Some(ref error) = self.error {
            return format!("Error executing query: {}", error);
        }
        if self.count == 0 {
            return "No results found in the knowledge graph for this query.".to_string();
        }

        if let Some(ref stats) = self.statistics {
            return format_statistics(stats);
        }

        let mut out = format!("Found {} result(s) for {}:\n\n", self.count, self.intent);
        for (i, record) in self.journeys.iter().enumerate() {
            let _ = writeln!(out, "Result {}:", i + 1);
            out.push_str(&format_journey_detail(record));
            out.push('\n');
        }
        out.trim_end().to_string()
    }
}

fn or_na<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "N/A".to_string())
}

/// Full per-journey block used by the structured-only context
pub fn format_journey_detail(record: &JourneyRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Journey ID: {}", record.feedback_id);
    let _ = writeln!(
        out,
        "Passenger Class: {}",
        record.passenger_class.as_deref().unwrap_or("Unknown")
    );
    let _ = writeln!(out, "Food Satisfaction: {}/5", or_na(&record.food_satisfaction_score));
    let _ = writeln!(out, "Arrival Delay: {} minutes", or_na(&record.arrival_delay_minutes));
    let _ = writeln!(out, "Distance: {} miles", or_na(&record.actual_flown_miles));
    let _ = writeln!(out, "Number of Legs: {}", or_na(&record.number_of_legs));
    let _ = writeln!(
        out,
        "Flight: {} ({})",
        or_na(&record.flight_number),
        or_na(&record.fleet_type)
    );
    let _ = writeln!(
        out,
        "Route: {} → {}",
        or_na(&record.departure_airport),
        or_na(&record.arrival_airport)
    );
    let _ = writeln!(
        out,
        "Passenger: {}, {} loyalty (Locator: {})",
        or_na(&record.generation),
        or_na(&record.loyalty_level),
        or_na(&record.record_locator)
    );
    out
}

fn format_statistics(stats: &StatisticsRecord) -> String {
    let avg = |v: Option<f64>| {
        v.map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "N/A".to_string())
    };
    format!(
        "Statistical Analysis:\n\
         Total Journeys: {}\n\
         Average Delay: {} minutes\n\
         Average Food Satisfaction: {}/5\n\
         Average Distance: {} miles\n\
         Delay Range: {} to {} minutes",
        stats.total_journeys,
        avg(stats.avg_delay),
        avg(stats.avg_food_score),
        avg(stats.avg_distance),
        or_na(&stats.min_delay),
        or_na(&stats.max_delay),
    )
}

/// Runs intent templates against the graph store
pub struct QueryExecutor {
    store: Arc<dyn GraphStore>,
    default_limit: u32,
}

impl QueryExecutor {
    pub fn new(store: Arc<dyn GraphStore>, config: &RetrievalConfig) -> Self {
        Self {
            store,
            default_limit: config.structured_limit,
        }
    }

    /// Build the statement for an intent with every entity bound as a filter
    pub fn prepare(&self, intent: Intent, entities: &EntitySet) -> Statement {
        let template = Template::for_intent(intent);
        let sort = entities.sort_order.zip(entities.sort_attribute);

        let statement = Statement::new(template.render(sort));
        let statement = match template.airports {
            AirportFilter::Route => statement
                .param("from_airport", entities.departure_airport.clone())
                .param("to_airport", entities.arrival_airport.clone()),
            AirportFilter::Station => statement.param(
                "station_code",
                entities
                    .departure_airport
                    .clone()
                    .or_else(|| entities.arrival_airport.clone()),
            ),
        };

        let statement = statement
            .param(
                "passenger_class",
                entities.passenger_class.as_ref().map(|c| c.to_lowercase()),
            )
            .param(
                "generation",
                entities.generation.as_ref().map(|g| g.to_lowercase()),
            )
            .param(
                "number_of_legs",
                entities.number_of_legs.map(i64::from),
            )
            .param(
                "flight_number",
                entities.flight_no.as_ref().map(|f| f.to_uppercase()),
            )
            .param(
                "fleet_type",
                entities.fleet_type.as_ref().map(|f| f.to_uppercase()),
            );

        if template.is_aggregate() {
            statement
        } else {
            let limit = entities.limit.unwrap_or(self.default_limit);
            statement.param("limit", ParamValue::Int(i64::from(limit)))
        }
    }

    /// Execute the intent's template; never fails past this boundary
    pub async fn execute(&self, intent: Intent, entities: &EntitySet) -> QueryResult {
        let statement = self.prepare(intent, entities);
        let start = Instant::now();

        let outcome = if intent.is_statistic() {
            self.store
                .statistics(&statement)
                .await
                .map(|stats| (Vec::new(), stats))
        } else {
            self.store
                .journeys(&statement)
                .await
                .map(|journeys| (journeys, None))
        };

        match outcome {
            Ok((journeys, statistics)) => {
                let count = if statistics.is_some() {
                    1
                } else {
                    journeys.len()
                };
                tracing::info!(
                    intent = %intent,
                    count,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Structured query complete"
                );
                QueryResult {
                    intent,
                    statement,
                    journeys,
                    statistics,
                    count,
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(intent = %intent, "Structured query failed: {}", e);
                QueryResult::failed(intent, statement, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FlightRagError, Result};
    use crate::preprocess::extract_entities;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        journeys: Vec<JourneyRecord>,
        fail: bool,
        seen: Mutex<Vec<Statement>>,
    }

    #[async_trait]
    impl GraphStore for RecordingStore {
        async fn journeys(&self, statement: &Statement) -> Result<Vec<JourneyRecord>> {
            self.seen.lock().unwrap().push(statement.clone());
            if self.fail {
                return Err(FlightRagError::Graph("connection refused".to_string()));
            }
            Ok(self.journeys.clone())
        }

        async fn statistics(&self, statement: &Statement) -> Result<Option<StatisticsRecord>> {
            self.seen.lock().unwrap().push(statement.clone());
            Ok(Some(StatisticsRecord {
                total_journeys: 4,
                avg_delay: Some(12.5),
                avg_food_score: Some(3.25),
                avg_distance: Some(1500.0),
                min_delay: Some(-3),
                max_delay: Some(40),
            }))
        }

        async fn ping(&self) -> Result<()> {
            Ok(())
        }
    }

    fn executor(store: Arc<RecordingStore>) -> QueryExecutor {
        QueryExecutor::new(store, &RetrievalConfig::default())
    }

    #[test]
    fn test_prepare_binds_entities() {
        let exec = executor(Arc::new(RecordingStore::default()));
        let entities = extract_entities("economy flights from CAI to DXB on the B787");
        let statement = exec.prepare(Intent::FindFlights, &entities);

        assert_eq!(statement.get("from_airport"), Some(&ParamValue::from("CAI")));
        assert_eq!(statement.get("to_airport"), Some(&ParamValue::from("DXB")));
        assert_eq!(statement.get("passenger_class"), Some(&ParamValue::from("economy")));
        assert_eq!(statement.get("fleet_type"), Some(&ParamValue::from("B787")));
        assert_eq!(statement.get("generation"), Some(&ParamValue::Null));
        assert_eq!(statement.get("limit"), Some(&ParamValue::Int(20)));
        assert!(statement.get("station_code").is_none());
    }

    #[test]
    fn test_prepare_airport_info_station() {
        let exec = executor(Arc::new(RecordingStore::default()));
        let entities = extract_entities("Tell me about airport ORD");
        let statement = exec.prepare(Intent::AirportInfo, &entities);
        assert_eq!(statement.get("station_code"), Some(&ParamValue::from("ORD")));
        assert!(statement.get("from_airport").is_none());
    }

    #[test]
    fn test_prepare_statistic_has_no_limit() {
        let exec = executor(Arc::new(RecordingStore::default()));
        let statement = exec.prepare(Intent::CalculateStatistic, &EntitySet::default());
        assert!(statement.get("limit").is_none());
    }

    #[test]
    fn test_non_stop_question_is_satisfiable() {
        let exec = executor(Arc::new(RecordingStore::default()));
        let question = "Show non-stop flights from CAI to DXB";
        let intent = crate::preprocess::classify_intent(question);
        let entities = extract_entities(question);
        let statement = exec.prepare(intent, &entities);

        assert_eq!(intent, Intent::MultiLegFlights);
        assert_eq!(statement.get("number_of_legs"), Some(&ParamValue::Int(1)));
        let bare_multi_leg = statement.cypher.lines().any(|line| {
            let predicate = line.trim().trim_start_matches("WHERE ").trim_start_matches("AND ");
            predicate == "j.number_of_legs > 1"
        });
        assert!(
            !bare_multi_leg,
            "leg count conflicts with the multi-leg condition: {}",
            statement.cypher
        );
        assert!(statement
            .cypher
            .contains("($number_of_legs IS NOT NULL OR j.number_of_legs > 1)"));
    }

    #[test]
    fn test_extracted_limit_wins() {
        let exec = executor(Arc::new(RecordingStore::default()));
        let entities = extract_entities("top 5 shortest journeys");
        let statement = exec.prepare(Intent::ShortestJourneys, &entities);
        assert_eq!(statement.get("limit"), Some(&ParamValue::Int(5)));
    }

    #[tokio::test]
    async fn test_execute_listing() {
        let store = Arc::new(RecordingStore {
            journeys: vec![JourneyRecord::new("F_1"), JourneyRecord::new("F_2")],
            ..Default::default()
        });
        let result = executor(store.clone())
            .execute(Intent::DelayAnalysis, &EntitySet::default())
            .await;

        assert!(result.is_ok());
        assert_eq!(result.count, 2);
        assert_eq!(store.seen.lock().unwrap().len(), 1);
        let text = result.format_for_llm();
        assert!(text.starts_with("Found 2 result(s) for delay_analysis:"));
        assert!(text.contains("Journey ID: F_2"));
        assert!(text.contains("Arrival Delay: N/A minutes"));
    }

    #[tokio::test]
    async fn test_execute_statistic() {
        let result = executor(Arc::new(RecordingStore::default()))
            .execute(Intent::CalculateStatistic, &EntitySet::default())
            .await;

        assert_eq!(result.count, 1);
        let text = result.format_for_llm();
        assert!(text.contains("Total Journeys: 4"));
        assert!(text.contains("Average Delay: 12.50 minutes"));
        assert!(text.contains("Delay Range: -3 to 40 minutes"));
    }

    #[tokio::test]
    async fn test_execute_failure_is_captured() {
        let store = Arc::new(RecordingStore {
            fail: true,
            ..Default::default()
        });
        let result = executor(store)
            .execute(Intent::FindFlights, &EntitySet::default())
            .await;

        assert_eq!(result.count, 0);
        assert!(result.journeys.is_empty());
        assert!(result.error.as_deref().unwrap().contains("connection refused"));
        assert!(result.format_for_llm().starts_with("Error executing query:"));
    }
}
