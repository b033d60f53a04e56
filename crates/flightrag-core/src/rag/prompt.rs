//! Prompt assembly: persona, context, task and the user's question

use crate::error::FlightRagError;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::str::FromStr;

const RULE: &str = "================================================================================";
const THIN_RULE: &str = "--------------------------------------------------------------------------------";

const INSTRUCTIONS: &[&str] = &[
    "Use ONLY the information provided in the CONTEXT section",
    "If the CONTEXT doesn't contain enough information, say: 'I don't have sufficient data to answer this question'",
    "Provide specific examples from the data (journey IDs, metrics, numbers)",
    "Be concise and factual - avoid speculation",
    "Do NOT make up or hallucinate any flight numbers, delays, or statistics",
    "If you see conflicting data, mention both sources",
];

/// Assistant persona variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    #[default]
    Default,
    Detailed,
    Concise,
    Executive,
    Technical,
}

impl Persona {
    pub const ALL: [Persona; 5] = [
        Persona::Default,
        Persona::Detailed,
        Persona::Concise,
        Persona::Executive,
        Persona::Technical,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Persona::Default => "default",
            Persona::Detailed => "detailed",
            Persona::Concise => "concise",
            Persona::Executive => "executive",
            Persona::Technical => "technical",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Persona::Default => {
                "You are an airline company insights assistant. Your role is to analyze
flight performance data and passenger satisfaction metrics to help the airline
improve service quality. You provide factual, data-driven insights based on
actual flight records and passenger feedback."
            }
            Persona::Detailed => {
                "You are an expert airline operations analyst with deep knowledge of
passenger satisfaction metrics, flight performance indicators, and service quality
assessment. You provide comprehensive, data-driven insights with specific
recommendations for operational improvements."
            }
            Persona::Concise => {
                "You are an airline data assistant. Provide brief, factual answers
based on flight data."
            }
            Persona::Executive => {
                "You are an executive airline insights advisor. Provide high-level
strategic insights focusing on business impact, customer satisfaction trends,
and actionable recommendations for senior management."
            }
            Persona::Technical => {
                "You are a technical airline data analyst. Provide precise statistical
analysis of flight operations data, including exact metrics, percentages, and
data-driven observations."
            }
        }
    }
}

impl FromStr for Persona {
    type Err = FlightRagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Persona::ALL
            .iter()
            .copied()
            .find(|p| p.key() == s)
            .ok_or_else(|| FlightRagError::InvalidInput(format!("unknown persona: {}", s)))
    }
}

/// Question/answer pair used to steer few-shot prompts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FewShotExample {
    pub question: String,
    pub answer: String,
}

impl FewShotExample {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    pub fn defaults() -> Vec<FewShotExample> {
        vec![
            FewShotExample::new(
                "Which flights have the longest delays?",
                "Based on the data, Journey J_123 has the longest delay at 104 minutes, followed by Journey J_456 with 87 minutes delay. Both are Economy class flights.",
            ),
            FewShotExample::new(
                "What is the average food satisfaction score?",
                "The average food satisfaction across the provided journeys is 2.3 out of 5, indicating below-average food quality.",
            ),
        ]
    }
}

/// Builds prompts around a persona
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    persona: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::with_persona(Persona::Default)
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_persona(persona: Persona) -> Self {
        Self {
            persona: persona.text().to_string(),
        }
    }

    pub fn with_custom_persona(persona: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
        }
    }

    pub fn set_persona(&mut self, persona: impl Into<String>) {
        self.persona = persona.into();
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// Full structured prompt with the grounding instructions
    pub fn build(&self, question: &str, context: &str) -> String {
        self.build_with(question, context, true)
    }

    pub fn build_with(&self, question: &str, context: &str, include_instructions: bool) -> String {
        let mut out = String::new();

        section(&mut out, "PERSONA:");
        let _ = writeln!(out, "{}\n", self.persona.trim());

        section(&mut out, "CONTEXT (Knowledge Graph Data):");
        let _ = writeln!(out, "{}\n", context.trim());

        section(&mut out, "TASK:");
        out.push_str("Answer the following question based ONLY on the CONTEXT provided above.\n\n");

        if include_instructions {
            out.push_str("IMPORTANT INSTRUCTIONS:\n");
            for (i, line) in INSTRUCTIONS.iter().enumerate() {
                let _ = writeln!(out, "{}. {}", i + 1, line);
            }
            out.push('\n');
        }

        let _ = writeln!(out, "{}", THIN_RULE);
        out.push_str("USER QUESTION:\n");
        let _ = writeln!(out, "{}", question.trim());
        let _ = writeln!(out, "{}\n", THIN_RULE);

        out.push_str("YOUR ANSWER:\n");
        out.push_str("(Provide a clear, factual answer based on the CONTEXT above)\n");
        out
    }

    /// Minimal prompt for models that do better with less structure
    pub fn build_simple(&self, question: &str, context: &str) -> String {
        format!(
            "You are an airline insights assistant.\n\n\
             Based on this data:\n{}\n\n\
             Answer this question: {}\n\n\
             Use only the data provided. Be specific and factual.",
            context, question
        )
    }

    /// Prompt preceded by worked examples; `None` uses the built-in pair
    pub fn build_few_shot(
        &self,
        question: &str,
        context: &str,
        examples: Option<&[FewShotExample]>,
    ) -> String {
        let defaults;
        let examples = match examples {
            Some(examples) => examples,
            None => {
                defaults = FewShotExample::defaults();
                &defaults[..]
            }
        };

        let mut out = String::new();
        let _ = writeln!(out, "{}\n", self.persona);
        out.push_str("Here are some example questions and answers:\n\n");
        for (i, example) in examples.iter().enumerate() {
            let _ = writeln!(out, "Example {}:", i + 1);
            let _ = writeln!(out, "Q: {}", example.question);
            let _ = writeln!(out, "A: {}\n", example.answer);
        }
        out.push_str("Now answer this question based on the provided data:\n\n");
        let _ = writeln!(out, "DATA:\n{}\n", context);
        let _ = writeln!(out, "QUESTION: {}\n", question);
        out.push_str("ANSWER:");
        out
    }
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}\n{}\n{}", RULE, title, RULE);
}
