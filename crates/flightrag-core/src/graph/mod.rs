//! Knowledge-graph access
//!
//! The graph holds four node types (Passenger, Journey, Flight, Airport)
//! linked as `(Passenger)-[:TOOK]->(Journey)-[:ON]->(Flight)` with
//! `DEPARTS_FROM`/`ARRIVES_AT` edges to airports. Retrieval code builds
//! [`Statement`]s and hands them to a [`GraphStore`].

mod neo4j;

pub use neo4j::Neo4jStore;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Read access to the journey graph
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Run a statement returning journey rows
    async fn journeys(&self, statement: &Statement) -> Result<Vec<JourneyRecord>>;

    /// Run a statement returning a single aggregate row
    async fn statistics(&self, statement: &Statement) -> Result<Option<StatisticsRecord>>;

    /// Round-trip a trivial query
    async fn ping(&self) -> Result<()>;
}

/// Bound query parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
    Floats(Vec<f64>),
}

impl ParamValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }
}

impl From<Option<String>> for ParamValue {
    fn from(value: Option<String>) -> Self {
        value.map(ParamValue::Str).unwrap_or(ParamValue::Null)
    }
}

impl From<Option<i64>> for ParamValue {
    fn from(value: Option<i64>) -> Self {
        value.map(ParamValue::Int).unwrap_or(ParamValue::Null)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<Vec<f32>> for ParamValue {
    fn from(value: Vec<f32>) -> Self {
        ParamValue::Floats(value.into_iter().map(f64::from).collect())
    }
}

/// Cypher text plus its named parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub cypher: String,
    pub params: BTreeMap<String, ParamValue>,
}

impl Statement {
    pub fn new(cypher: impl Into<String>) -> Self {
        Self {
            cypher: cypher.into(),
            params: BTreeMap::new(),
        }
    }

    /// Bind a parameter, replacing any previous value
    pub fn param(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }
}

/// Which retrieval path produced a merged record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Structured,
    Semantic,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Structured => f.write_str("structured"),
            Provenance::Semantic => f.write_str("semantic"),
        }
    }
}

/// One passenger journey with its flight, airports and passenger attributes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JourneyRecord {
    #[serde(rename = "feedback_ID", alias = "feedback_id", deserialize_with = "text_or_number")]
    pub feedback_id: String,
    #[serde(default)]
    pub passenger_class: Option<String>,
    #[serde(default)]
    pub food_satisfaction_score: Option<i64>,
    #[serde(default)]
    pub arrival_delay_minutes: Option<i64>,
    #[serde(default)]
    pub actual_flown_miles: Option<i64>,
    #[serde(default)]
    pub number_of_legs: Option<i64>,
    #[serde(default, deserialize_with = "optional_text_or_number")]
    pub flight_number: Option<String>,
    #[serde(default)]
    pub fleet_type: Option<String>,
    #[serde(default)]
    pub departure_airport: Option<String>,
    #[serde(default)]
    pub arrival_airport: Option<String>,
    #[serde(default)]
    pub generation: Option<String>,
    #[serde(default, deserialize_with = "optional_text_or_number")]
    pub loyalty_level: Option<String>,
    #[serde(default)]
    pub record_locator: Option<String>,
    /// Cosine similarity, only for semantically retrieved rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Provenance>,
}

impl JourneyRecord {
    pub fn new(feedback_id: impl Into<String>) -> Self {
        Self {
            feedback_id: feedback_id.into(),
            ..Default::default()
        }
    }

    pub fn with_provenance(mut self, source: Provenance) -> Self {
        self.source = Some(source);
        self
    }
}

/// Aggregate row returned by the statistics template
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatisticsRecord {
    #[serde(default)]
    pub total_journeys: i64,
    #[serde(default)]
    pub avg_delay: Option<f64>,
    #[serde(default)]
    pub avg_food_score: Option<f64>,
    #[serde(default)]
    pub avg_distance: Option<f64>,
    #[serde(default)]
    pub min_delay: Option<i64>,
    #[serde(default)]
    pub max_delay: Option<i64>,
}

/// Identifiers and flight numbers may be stored as strings or integers
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<TextOrNumber> for String {
    fn from(value: TextOrNumber) -> Self {
        match value {
            TextOrNumber::Text(s) => s,
            TextOrNumber::Int(n) => n.to_string(),
            TextOrNumber::Float(n) => n.to_string(),
        }
    }
}

fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    TextOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_text_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(String::from))
}
