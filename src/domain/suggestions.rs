//! Writing suggestions: the prompt sent to the completion service and the
//! best-effort reading of whatever text comes back.

use serde_json::Value;

use super::error::DomainError;

/// Maximum number of lines kept when the reply is not the requested JSON.
pub const FALLBACK_LIMIT: usize = 5;
/// A fallback line must be longer than this many characters once trimmed.
pub const FALLBACK_MIN_CHARS: usize = 10;

const UNTITLED: &str = "Untitled";
const NO_CONTENT: &str = "No content yet";

/// The draft a suggestion request is about. At least one side is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    title: Option<String>,
    content: Option<String>,
}

impl Draft {
    pub fn new(title: Option<String>, content: Option<String>) -> Result<Self, DomainError> {
        let title = title.filter(|value| !value.is_empty());
        let content = content.filter(|value| !value.is_empty());
        if title.is_none() && content.is_none() {
            return Err(DomainError::validation("Title or content is required"));
        }
        Ok(Self { title, content })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn prompt(&self) -> String {
        let title = self.title().unwrap_or(UNTITLED);
        let content = self.content().unwrap_or(NO_CONTENT);
        format!(
            r#"You are a creative blog writing assistant. Based on the blog post below, generate exactly 5 helpful suggestions.

Title: "{title}"
Content: "{content}"

Please provide the suggestions in the following JSON format. Make sure all strings are properly escaped.
{{
  "suggestions": [
    "Related topic: [Your suggestion here]",
    "Related topic: [Your suggestion here]",
    "Intro paragraph: [Your suggestion here]",
    "SEO tip: [Your suggestion here without quotes]",
    "Content idea: [Your suggestion here]"
  ]
}}

Return ONLY valid JSON, nothing else. Do not use nested quotes inside the suggestions string values."#
        )
    }
}

/// Outcome of reading a completion reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedSuggestions {
    /// The reply was the requested JSON document.
    Strict(Vec<String>),
    /// The reply was free text; long enough lines were taken instead.
    Fallback(Vec<String>),
}

impl ParsedSuggestions {
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Strict(_))
    }

    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Strict(items) | Self::Fallback(items) => items,
        }
    }
}

/// Parse the reply after removing code fences. Any JSON document is read
/// strictly: its `suggestions` string array, or nothing when the shape is
/// wrong. Only text that is not JSON at all goes through line extraction.
pub fn parse_reply(raw: &str) -> ParsedSuggestions {
    match parse_strict(raw) {
        Some(items) => ParsedSuggestions::Strict(items),
        None => ParsedSuggestions::Fallback(extract_lines(raw)),
    }
}

fn parse_strict(raw: &str) -> Option<Vec<String>> {
    let cleaned = strip_code_fences(raw);
    let document = serde_json::from_str::<Value>(cleaned.trim()).ok()?;
    let items: Vec<String> = document
        .get("suggestions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Some(items)
}

fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "")
}

fn extract_lines(raw: &str) -> Vec<String> {
    raw.split('\n')
        .filter(|line| line.trim().chars().count() > FALLBACK_MIN_CHARS)
        .take(FALLBACK_LIMIT)
        .map(str::to_string)
        .collect()
}
