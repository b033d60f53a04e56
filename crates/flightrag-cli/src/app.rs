//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flightrag")]
#[command(
    author,
    version,
    about = "Ask questions about airline passenger survey data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, env = "FLIGHTRAG_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer a question from the knowledge graph
    Ask(AskArgs),

    /// Classify the intent of a question
    Intent(TextArgs),

    /// Extract entities from a question
    Entities(TextArgs),

    /// List generation and embedding models
    Models,

    /// Check graph store connectivity
    Check,

    /// Show configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct AskArgs {
    /// Question text
    #[arg(required = true)]
    pub question: Vec<String>,

    /// Generation model key
    #[arg(short, long)]
    pub model: Option<String>,

    /// Embedding model key for similarity search
    #[arg(long)]
    pub embedding_model: Option<String>,

    /// Skip the structured Cypher query
    #[arg(long)]
    pub no_structured: bool,

    /// Skip the vector similarity search
    #[arg(long)]
    pub no_semantic: bool,

    /// Assistant persona
    #[arg(long)]
    pub persona: Option<String>,

    /// Print the retrieved context
    #[arg(long)]
    pub show_context: bool,

    /// Print the prompt sent to the model
    #[arg(long)]
    pub show_prompt: bool,
}

#[derive(Args)]
pub struct TextArgs {
    /// Question text
    #[arg(required = true)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration with secrets masked
    Show,
    /// Print the config file path
    Path,
    /// Write the effective configuration to the config file
    Init {
        /// Import a legacy KEY=VALUE file (URI, USERNAME, PASSWORD, HF_TOKEN)
        #[arg(long)]
        from: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}

pub fn join_words(words: &[String]) -> String {
    words.join(" ").trim().to_string()
}
