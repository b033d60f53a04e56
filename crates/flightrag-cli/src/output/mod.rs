//! Output formatters

pub mod json;
pub mod terminal;

use crate::app::OutputFormat;
use serde::Serialize;

/// Print `value` as JSON or through the terminal renderer
pub fn emit<T, F>(value: &T, format: OutputFormat, render: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    let text = match format {
        OutputFormat::Json => json::format_value(value)?,
        OutputFormat::Cli => render(value),
    };
    print!("{}", text);
    Ok(())
}
