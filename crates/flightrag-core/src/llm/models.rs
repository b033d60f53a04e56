//! Hosted models available for answer generation

use serde::Serialize;

/// How a model is invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationStyle {
    /// Message array against `/v1/chat/completions`
    Chat,
    /// Raw prompt against `/v1/completions`
    Text,
}

/// One row of the model table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelSpec {
    pub key: &'static str,
    pub name: &'static str,
    pub style: InvocationStyle,
}

pub const DEFAULT_MAX_TOKENS: u32 = 512;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Static model table keyed by short name
pub const MODELS: &[ModelSpec] = &[
    ModelSpec {
        key: "openai",
        name: "openai/gpt-oss-120b",
        style: InvocationStyle::Chat,
    },
    ModelSpec {
        key: "qwen",
        name: "Qwen/Qwen2.5-7B-Instruct",
        style: InvocationStyle::Chat,
    },
    ModelSpec {
        key: "llama",
        name: "meta-llama/Llama-3.1-8B-Instruct",
        style: InvocationStyle::Chat,
    },
    ModelSpec {
        key: "phi",
        name: "microsoft/Phi-3-mini-4k-instruct",
        style: InvocationStyle::Text,
    },
];

/// Look up a model by key
pub fn find_model(key: &str) -> Option<&'static ModelSpec> {
    MODELS.iter().find(|spec| spec.key == key)
}

/// All model keys, in table order
pub fn model_keys() -> Vec<&'static str> {
    MODELS.iter().map(|spec| spec.key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let qwen = find_model("qwen").unwrap();
        assert_eq!(qwen.name, "Qwen/Qwen2.5-7B-Instruct");
        assert_eq!(qwen.style, InvocationStyle::Chat);
        assert_eq!(find_model("phi").unwrap().style, InvocationStyle::Text);
        assert!(find_model("gpt-5").is_none());
        assert_eq!(model_keys(), vec!["openai", "qwen", "llama", "phi"]);
    }
}
