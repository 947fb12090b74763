use crate::utils::text::{normalize_lines, strip_markdown};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tracing::debug;

const CATEGORY_KEYS: [&str; 3] = ["category", "标签", "type"];
const SUMMARY_KEYS: [&str; 2] = ["summary", "摘要"];

/// Structured output of summarization: a short category label and the
/// summary text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brief {
    pub category: String,
    pub summary: String,
}

impl Brief {
    pub fn new(category: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            summary: summary.into(),
        }
    }

    /// `【category】title` followed by the summary on the next line.
    pub fn format_plaintext(&self, title: &str) -> String {
        let prefix = if self.category.is_empty() {
            String::new()
        } else {
            format!("【{}】", self.category)
        };
        let header = format!("{}{}", prefix, title).trim().to_string();

        if self.summary.is_empty() {
            header
        } else if header.is_empty() {
            self.summary.clone()
        } else {
            format!("{}\n{}", header, self.summary)
        }
    }
}

/// Shape of a provider response after decoding attempts.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    StructuredMapping(Map<String, Value>),
    StructuredList(Vec<Value>),
    RawText(String),
    Unparseable,
}

impl ResponseShape {
    pub fn classify(raw: &str) -> Self {
        let text = raw.trim();
        if text.is_empty() {
            return Self::Unparseable;
        }

        match decode_json(text) {
            Some(Value::Object(map)) => Self::StructuredMapping(map),
            Some(Value::Array(items)) => Self::StructuredList(items),
            _ => Self::RawText(text.to_string()),
        }
    }
}

/// Extract a [`Brief`] from free-form provider output.
///
/// Structured JSON is tried first; when it yields nothing usable the
/// labeled-field form (`类别：…` / `摘要：…`) is tried on the raw text.
pub fn parse(raw: &str) -> Option<Brief> {
    let text = raw.trim();
    let brief = match ResponseShape::classify(text) {
        ResponseShape::Unparseable => None,
        ResponseShape::StructuredMapping(map) => {
            brief_from_mapping(&map).or_else(|| brief_from_labels(text))
        }
        ResponseShape::StructuredList(items) => items
            .iter()
            .filter_map(Value::as_object)
            .find_map(brief_from_mapping)
            .or_else(|| brief_from_labels(text)),
        ResponseShape::RawText(text) => brief_from_labels(&text),
    };

    if brief.is_none() {
        debug!("Provider response did not contain a usable brief");
    }
    brief
}

/// Strict decode of the whole text, then of the outermost `{...}` span.
fn decode_json(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start >= end {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

pub fn brief_from_mapping(map: &Map<String, Value>) -> Option<Brief> {
    let category = first_present(map, &CATEGORY_KEYS);
    let summary = clean_summary(&first_present(map, &SUMMARY_KEYS));
    if category.is_empty() || summary.is_empty() {
        return None;
    }
    Some(Brief::new(category, summary))
}

/// First key holding a non-empty value, stringified and trimmed.
fn first_present(map: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !is_blank(value))
        .map(stringify)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Null, `false`, zero and empty strings, arrays or objects.
pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn clean_summary(summary: &str) -> String {
    normalize_lines(&strip_markdown(summary))
}

fn category_label() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"类别[:：]\s*(\w+)").expect("valid category pattern"))
}

fn summary_label() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)摘要[:：](.*)").expect("valid summary pattern"))
}

/// Labeled plain-text form; both labels must be present and non-empty.
pub fn brief_from_labels(text: &str) -> Option<Brief> {
    let category = category_label()
        .captures(text)?
        .get(1)?
        .as_str()
        .trim()
        .to_string();
    let summary = clean_summary(summary_label().captures(text)?.get(1)?.as_str());

    if category.is_empty() || summary.is_empty() {
        return None;
    }
    Some(Brief::new(category, summary))
}
