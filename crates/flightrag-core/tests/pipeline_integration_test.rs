//! Integration tests for the question-answering pipeline
//!
//! The graph store, embedder and hosted model are replaced with in-memory
//! fakes so every stage runs without external services.

use async_trait::async_trait;
use flightrag_core::embeddings::EmbedderFactory;
use flightrag_core::graph::ParamValue;
use flightrag_core::rag::NO_DATA;
use flightrag_core::{
    AnswerOptions, ChatMessage, Config, Embedder, EmbedderRegistry, EmbeddingModel, FlightRagError,
    GenerationParams, GraphRagPipeline, GraphStore, Intent, JourneyRecord, LLMClient, Provenance,
    Result, ServiceContext, Statement, StatisticsRecord,
};
use std::sync::{Arc, Mutex};

fn journey(id: &str, delay: i64) -> JourneyRecord {
    JourneyRecord {
        passenger_class: Some("Economy".to_string()),
        food_satisfaction_score: Some(2),
        arrival_delay_minutes: Some(delay),
        actual_flown_miles: Some(1400),
        number_of_legs: Some(1),
        departure_airport: Some("CAI".to_string()),
        arrival_airport: Some("DXB".to_string()),
        ..JourneyRecord::new(id)
    }
}

fn scored(id: &str, delay: i64, score: f64) -> JourneyRecord {
    JourneyRecord {
        score: Some(score),
        ..journey(id, delay)
    }
}

#[derive(Default)]
struct FakeGraph {
    structured: Vec<JourneyRecord>,
    semantic: Vec<JourneyRecord>,
    statistics: Option<StatisticsRecord>,
    fail: bool,
    statements: Mutex<Vec<Statement>>,
}

#[async_trait]
impl GraphStore for FakeGraph {
    async fn journeys(&self, statement: &Statement) -> Result<Vec<JourneyRecord>> {
        self.statements.lock().unwrap().push(statement.clone());
        if self.fail {
            return Err(FlightRagError::Graph("ServiceUnavailable".to_string()));
        }
        if statement.cypher.contains("db.index.vector.queryNodes") {
            Ok(self.semantic.clone())
        } else {
            Ok(self.structured.clone())
        }
    }

    async fn statistics(&self, statement: &Statement) -> Result<Option<StatisticsRecord>> {
        self.statements.lock().unwrap().push(statement.clone());
        Ok(self.statistics.clone())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

struct FakeEmbedder;

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![0.1; 384])
    }

    fn dimensions(&self) -> usize {
        384
    }

    fn model_name(&self) -> &str {
        "fake-minilm"
    }
}

#[derive(Default)]
struct FakeLlm {
    time_out: bool,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl LLMClient for FakeLlm {
    async fn chat_completion(
        &self,
        _model: &str,
        messages: Vec<ChatMessage>,
        _params: &GenerationParams,
    ) -> Result<String> {
        let prompt = messages
            .into_iter()
            .map(|m| m.content)
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts.lock().unwrap().push(prompt);
        if self.time_out {
            return Err(FlightRagError::Llm("operation timed out".to_string()));
        }
        Ok("Journey J1 had the longest delay at 100 minutes.".to_string())
    }

    async fn text_completion(
        &self,
        _model: &str,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok("text answer".to_string())
    }
}

fn pipeline(graph: Arc<FakeGraph>, llm: Arc<FakeLlm>) -> GraphRagPipeline {
    let factory: EmbedderFactory = Box::new(|_| Ok(Arc::new(FakeEmbedder) as Arc<dyn Embedder>));
    let embedders = Arc::new(EmbedderRegistry::with_factory(EmbeddingModel::Minilm, factory));
    let services = ServiceContext::new(graph, embedders, llm);

    let mut config = Config::default();
    config.llm.default_model = "qwen".to_string();
    GraphRagPipeline::new(&services, &config)
}

fn overlapping_graph() -> FakeGraph {
    FakeGraph {
        structured: vec![journey("J1", 100)],
        semantic: vec![scored("J1", 100, 0.9), scored("J2", 50, 0.8)],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_full_pipeline_combines_both_paths() {
    let graph = Arc::new(overlapping_graph());
    let llm = Arc::new(FakeLlm::default());
    let outcome = pipeline(graph.clone(), llm.clone())
        .answer(
            "Which flights from CAI to DXB had the longest delays?",
            &AnswerOptions::default(),
        )
        .await;

    assert_eq!(outcome.intent, Intent::MostDelayedFlights);
    assert_eq!(outcome.entities.departure_airport.as_deref(), Some("CAI"));
    assert_eq!(outcome.entities.arrival_airport.as_deref(), Some("DXB"));
    assert!(outcome.success);
    assert_eq!(outcome.response.model, "qwen");
    assert!(outcome.answer.unwrap().contains("J1"));

    let combined = outcome.combined.expect("both paths ran");
    assert_eq!(combined.total_count, 2);
    assert_eq!(combined.unique[0].source, Some(Provenance::Structured));
    assert_eq!(combined.unique[1].source, Some(Provenance::Semantic));
    assert_eq!(combined.avg_delay, Some(75.0));
    assert_eq!(outcome.context, combined.formatted);

    let prompts = llm.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("KNOWLEDGE GRAPH DATA (Intent: most_delayed_flights):"));
    assert!(prompts[0].contains("USER QUESTION:\nWhich flights from CAI to DXB had the longest delays?"));

    let statements = graph.statements.lock().unwrap();
    assert_eq!(statements.len(), 2);
    assert_eq!(
        statements[0].get("from_airport"),
        Some(&ParamValue::Str("CAI".to_string()))
    );
    assert_eq!(
        statements[1].get("index_name"),
        Some(&ParamValue::Str("journey_embedding_minilm_index".to_string()))
    );
}

#[tokio::test]
async fn test_generation_failure_keeps_earlier_stages() {
    let llm = Arc::new(FakeLlm {
        time_out: true,
        ..Default::default()
    });
    let outcome = pipeline(Arc::new(overlapping_graph()), llm)
        .answer("What is the average delay in economy?", &AnswerOptions::default())
        .await;

    assert!(!outcome.success);
    assert!(outcome.answer.is_none());
    let error = outcome.response.error.as_deref().unwrap();
    assert!(!error.is_empty());
    assert!(error.contains("timed out"));

    assert_eq!(outcome.intent, Intent::CalculateStatistic);
    assert_eq!(outcome.entities.passenger_class.as_deref(), Some("economy"));
    assert!(outcome.structured.is_some());
    assert_eq!(outcome.semantic.as_ref().unwrap().count, 2);
    assert!(!outcome.prompt.is_empty());
}

#[tokio::test]
async fn test_semantic_only_uses_search_context() {
    let graph = Arc::new(overlapping_graph());
    let options = AnswerOptions {
        use_structured: false,
        ..Default::default()
    };
    let outcome = pipeline(graph.clone(), Arc::new(FakeLlm::default()))
        .answer("long delays and poor food", &options)
        .await;

    assert!(outcome.structured.is_none());
    assert!(outcome.combined.is_none());
    assert!(outcome
        .context
        .starts_with("Found 2 similar journeys for query: 'long delays and poor food'"));
    assert_eq!(graph.statements.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_structured_only_uses_query_context() {
    let options = AnswerOptions {
        use_semantic: false,
        ..Default::default()
    };
    let outcome = pipeline(Arc::new(overlapping_graph()), Arc::new(FakeLlm::default()))
        .answer("Show me the most delayed flights", &options)
        .await;

    assert!(outcome.semantic.is_none());
    assert!(outcome
        .context
        .starts_with("Found 1 result(s) for most_delayed_flights:"));
}

#[tokio::test]
async fn test_both_paths_disabled() {
    let graph = Arc::new(overlapping_graph());
    let llm = Arc::new(FakeLlm::default());
    let options = AnswerOptions {
        use_structured: false,
        use_semantic: false,
        ..Default::default()
    };
    let outcome = pipeline(graph.clone(), llm.clone())
        .answer("Any delays?", &options)
        .await;

    assert_eq!(outcome.context, NO_DATA);
    assert!(outcome.prompt.contains(NO_DATA));
    assert!(outcome.success);
    assert!(graph.statements.lock().unwrap().is_empty());
    assert_eq!(llm.prompts.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_graph_failure_does_not_abort() {
    let graph = Arc::new(FakeGraph {
        fail: true,
        ..Default::default()
    });
    let outcome = pipeline(graph, Arc::new(FakeLlm::default()))
        .answer("Show me flights from CAI to DXB", &AnswerOptions::default())
        .await;

    let structured = outcome.structured.unwrap();
    assert_eq!(structured.count, 0);
    assert!(structured.error.unwrap().contains("ServiceUnavailable"));
    assert!(outcome.semantic.unwrap().error.is_some());
    assert!(outcome.context.contains("1. EXACT MATCHES: No exact matches found."));
    assert!(outcome.success);
}

#[tokio::test]
async fn test_statistic_question_renders_aggregate() {
    let graph = Arc::new(FakeGraph {
        statistics: Some(StatisticsRecord {
            total_journeys: 42,
            avg_delay: Some(18.5),
            avg_food_score: Some(2.75),
            avg_distance: Some(1210.0),
            min_delay: Some(-5),
            max_delay: Some(180),
        }),
        semantic: vec![scored("J7", 30, 0.66)],
        ..Default::default()
    });
    let outcome = pipeline(graph, Arc::new(FakeLlm::default()))
        .answer(
            "How many business class journeys departed from LHR?",
            &AnswerOptions::default(),
        )
        .await;

    assert_eq!(outcome.intent, Intent::CalculateStatistic);
    assert!(outcome.context.contains("Total Journeys: 42"));
    assert!(outcome.context.contains("  - Departure airport: LHR"));
    assert!(outcome.context.contains("  - Passenger class: business"));
    assert!(outcome.context.contains("Journey ID: J7"));
}

#[tokio::test]
async fn test_unknown_model_is_a_failed_response() {
    let options = AnswerOptions {
        model: Some("gpt-5".to_string()),
        ..Default::default()
    };
    let llm = Arc::new(FakeLlm::default());
    let outcome = pipeline(Arc::new(overlapping_graph()), llm.clone())
        .answer("Show me flights", &options)
        .await;

    assert!(!outcome.success);
    assert!(outcome.response.error.unwrap().contains("gpt-5"));
    assert!(llm.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_text_model_receives_raw_prompt() {
    let options = AnswerOptions {
        model: Some("phi".to_string()),
        ..Default::default()
    };
    let llm = Arc::new(FakeLlm::default());
    let outcome = pipeline(Arc::new(overlapping_graph()), llm.clone())
        .answer("Show me flights", &options)
        .await;

    assert_eq!(outcome.answer.as_deref(), Some("text answer"));
    assert_eq!(llm.prompts.lock().unwrap()[0], outcome.prompt);
}
