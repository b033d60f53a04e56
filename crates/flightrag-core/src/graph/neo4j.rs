//! Neo4j-backed graph store

use super::{GraphStore, JourneyRecord, ParamValue, Statement, StatisticsRecord};
use crate::config::GraphConfig;
use crate::error::{FlightRagError, Result};
use async_trait::async_trait;
use neo4rs::{query, BoltNull, BoltType, ConfigBuilder, Graph, Query, Row};

/// Connection handle shared by every stage of a question
pub struct Neo4jStore {
    graph: Graph,
}

impl Neo4jStore {
    /// Connect using the configured URI and credentials
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let mut builder = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.username.as_str())
            .password(config.password.as_str());
        if let Some(ref database) = config.database {
            builder = builder.db(database.as_str());
        }

        let graph = Graph::connect(builder.build()?).await?;
        tracing::info!("Connected to graph store at {}", config.uri);
        Ok(Self { graph })
    }

    async fn rows(&self, statement: &Statement) -> Result<Vec<Row>> {
        tracing::debug!(params = ?statement.params, "Executing cypher");

        let mut stream = self.graph.execute(to_query(statement)).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }
}

fn to_query(statement: &Statement) -> Query {
    statement
        .params
        .iter()
        .fold(query(&statement.cypher), |q, (key, value)| {
            q.param(key, to_bolt(value))
        })
}

fn to_bolt(value: &ParamValue) -> BoltType {
    match value {
        ParamValue::Null => BoltType::Null(BoltNull),
        ParamValue::Int(n) => BoltType::from(*n),
        ParamValue::Float(f) => BoltType::from(*f),
        ParamValue::Str(s) => BoltType::from(s.clone()),
        ParamValue::Floats(values) => BoltType::from(values.clone()),
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn journeys(&self, statement: &Statement) -> Result<Vec<JourneyRecord>> {
        self.rows(statement)
            .await?
            .iter()
            .map(|row| {
                row.to::<JourneyRecord>()
                    .map_err(|e| FlightRagError::Graph(e.to_string()))
            })
            .collect()
    }

    async fn statistics(&self, statement: &Statement) -> Result<Option<StatisticsRecord>> {
        self.rows(statement)
            .await?
            .first()
            .map(|row| {
                row.to::<StatisticsRecord>()
                    .map_err(|e| FlightRagError::Graph(e.to_string()))
            })
            .transpose()
    }

    async fn ping(&self) -> Result<()> {
        let mut stream = self.graph.execute(query("RETURN 1 AS ok")).await?;
        match stream.next().await? {
            Some(_) => Ok(()),
            None => Err(FlightRagError::Graph("empty response to RETURN 1".to_string())),
        }
    }
}
