//! Intent command

use crate::app::{join_words, OutputFormat, TextArgs};
use crate::output;
use anyhow::Result;
use flightrag_core::{classify_intent, Intent};
use serde::Serialize;

#[derive(Serialize)]
struct IntentReport {
    text: String,
    intent: Intent,
}

pub fn run(args: TextArgs, format: OutputFormat) -> Result<()> {
    let text = join_words(&args.text);
    let report = IntentReport {
        intent: classify_intent(&text),
        text,
    };
    output::emit(&report, format, |r| format!("{}\n", r.intent))
}
