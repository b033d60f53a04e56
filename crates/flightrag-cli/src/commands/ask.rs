//! Ask command

use crate::app::{join_words, AskArgs, OutputFormat};
use crate::output::{self, terminal};
use anyhow::{bail, Result};
use flightrag_core::{
    AnswerOptions, EmbeddingModel, GraphRagPipeline, Persona, PromptBuilder, ServiceContext,
};
use std::path::Path;

pub async fn run(args: AskArgs, config_path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let question = join_words(&args.question);
    if question.is_empty() {
        bail!("question must not be empty");
    }

    let options = AnswerOptions {
        model: args.model,
        embedding_model: args
            .embedding_model
            .as_deref()
            .map(str::parse::<EmbeddingModel>)
            .transpose()?,
        use_structured: !args.no_structured,
        use_semantic: !args.no_semantic,
    };
    let persona = match args.persona {
        Some(ref key) => key.parse::<Persona>()?,
        None => Persona::default(),
    };

    let config = super::load_config(config_path)?;
    tracing::info!(uri = %config.graph.uri, "Connecting to graph store");
    let services = ServiceContext::connect(&config).await?;
    let pipeline = GraphRagPipeline::new(&services, &config)
        .with_prompt_builder(PromptBuilder::with_persona(persona));

    let outcome = pipeline.answer(&question, &options).await;

    let view = terminal::AnswerView {
        show_context: args.show_context,
        show_prompt: args.show_prompt,
    };
    output::emit(&outcome, format, |o| terminal::format_outcome(o, &view))?;

    if !outcome.success {
        bail!("model '{}' did not produce an answer", outcome.response.model);
    }
    Ok(())
}
