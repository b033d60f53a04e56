//! Entities command

use crate::app::{join_words, OutputFormat, TextArgs};
use crate::output::{self, terminal};
use anyhow::Result;
use flightrag_core::extract_entities;

pub fn run(args: TextArgs, format: OutputFormat) -> Result<()> {
    let entities = extract_entities(&join_words(&args.text));
    output::emit(&entities, format, terminal::format_entities)
}
