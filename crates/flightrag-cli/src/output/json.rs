//! JSON output formatter

use serde::Serialize;

pub fn format_value<T: Serialize>(value: &T) -> serde_json::Result<String> {
    Ok(serde_json::to_string_pretty(value)? + "\n")
}
