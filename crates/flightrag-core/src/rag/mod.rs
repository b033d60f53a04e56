//! Answer generation: combine retrieved evidence, build the prompt, ask a model

mod combiner;
mod pipeline;
mod prompt;

pub use combiner::{mean, merge_unique, CombinedContext, ResultCombiner};
pub use pipeline::{AnswerOptions, GraphRagPipeline, PipelineOutcome, ServiceContext, NO_DATA};
pub use prompt::{FewShotExample, Persona, PromptBuilder};
