//! Structured retrieval over the knowledge graph

mod executor;
mod templates;

pub use executor::{format_journey_detail, QueryExecutor, QueryResult};
pub use templates::{AirportFilter, Template, JOURNEY_COLUMNS};
