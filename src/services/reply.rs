// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{AnalysisResult, DocumentType, Verdict};
use crate::error::{Error, Result};
use crate::services::prompt::NOT_READABLE_MARKER;

/// Explanation as the model sends it. Every field is optional and loosely
/// typed; normalization fills the gaps.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExplanation {
    #[serde(rename = "type", alias = "documentType")]
    document_type: Option<Value>,
    title: Option<Value>,
    summary: Option<Value>,
    target_audience: Option<Value>,
    personal_impact: Option<Value>,
    action_items: Option<Value>,
    benefits: Option<Value>,
    deadlines: Option<Value>,
    trust_note: Option<Value>,
    #[serde(rename = "voice_script", alias = "voiceScript")]
    voice_script: Option<Value>,
}

/// Reasoning models wrap their scratch work in these before the answer.
static THINK_BLOCK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<think(?:ing)?>.*?</think(?:ing)?>").unwrap());

/// Placeholder titles that mean the model ignored the document.
const GENERIC_TITLES: &[&str] = &["PM Example", "Example Scheme"];

pub struct ReplyParser;

impl ReplyParser {
    /// Turn a model reply into a result and the verdict it implies.
    ///
    /// `source_text` is the document the reply is about; `confidence` feeds
    /// the default trust note.
    pub fn parse(raw: &str, source_text: &str, confidence: f32) -> Result<(AnalysisResult, Verdict)> {
        let without_thinking = THINK_BLOCK_REGEX.replace_all(raw, "");
        let trimmed = without_thinking.trim();

        if trimmed
            .to_uppercase()
            .trim_matches(|c: char| c == '"' || c == '.' || c.is_whitespace())
            == NOT_READABLE_MARKER
        {
            return Ok((AnalysisResult::unreadable(), Verdict::Unreadable));
        }

        let json = Self::extract_json(trimmed).ok_or_else(|| {
            Error::MalformedReply(format!(
                "no JSON object found in reply starting with '{}'",
                trimmed.chars().take(40).collect::<String>()
            ))
        })?;

        let raw: RawExplanation = serde_json::from_str(json)
            .map_err(|e| Error::MalformedReply(format!("invalid JSON: {e}")))?;

        Ok(Self::normalize(raw, source_text, confidence))
    }

    /// The JSON object inside a reply: bare, fenced, or surrounded by prose.
    fn extract_json(trimmed: &str) -> Option<&str> {
        if trimmed.starts_with('{') && trimmed.ends_with('}') {
            return Some(trimmed);
        }

        if let Some(start) = trimmed.find("```json") {
            let after_fence = &trimmed[start + 7..];
            if let Some(end) = after_fence.find("```") {
                return Some(after_fence[..end].trim());
            }
        }

        if let Some(start) = trimmed.find("```") {
            let after_fence = &trimmed[start + 3..];
            if let Some(end) = after_fence.find("```") {
                let content = after_fence[..end].trim();
                if content.starts_with('{') {
                    return Some(content);
                }
            }
        }

        // Outermost braces, for replies with a preamble or an unclosed fence
        let start = trimmed.find('{')?;
        let end = trimmed.rfind('}')?;
        (end > start).then(|| &trimmed[start..=end])
    }

    fn normalize(raw: RawExplanation, source_text: &str, confidence: f32) -> (AnalysisResult, Verdict) {
        let document_type = raw
            .document_type
            .as_ref()
            .and_then(as_text)
            .map(|t| DocumentType::parse(&t))
            .unwrap_or_default();

        let title = raw.title.as_ref().and_then(as_text);
        let summary = raw.summary.as_ref().and_then(as_text);
        let personal_impact = raw.personal_impact.as_ref().and_then(as_text);
        let action_items = raw.action_items.as_ref().and_then(as_list);
        let trust_note = raw.trust_note.as_ref().and_then(as_text);

        match document_type {
            DocumentType::Identity => {
                return (AnalysisResult::identity_block(), Verdict::IdentityBlocked);
            }
            DocumentType::Scam => {
                let fallback = AnalysisResult::scam_warning();
                let result = AnalysisResult {
                    title: title.unwrap_or(fallback.title),
                    summary: summary.unwrap_or(fallback.summary),
                    personal_impact: personal_impact.unwrap_or(fallback.personal_impact),
                    action_items: action_items
                        .filter(|items| !items.is_empty())
                        .unwrap_or(fallback.action_items),
                    trust_note: trust_note.unwrap_or(fallback.trust_note),
                    ..fallback
                };
                return (result, Verdict::ScamWarning);
            }
            DocumentType::LowQuality => {
                return (AnalysisResult::unreadable(), Verdict::Unreadable);
            }
            _ => {}
        }

        if let Some(ref t) = title
            && is_generic_title(t, source_text)
        {
            return (AnalysisResult::generic_fallback(), Verdict::Explained);
        }

        let result = AnalysisResult {
            title: title.unwrap_or_else(|| "Document Analysis".into()),
            summary: summary.unwrap_or_else(|| "Analysis completed".into()),
            target_audience: raw
                .target_audience
                .as_ref()
                .and_then(as_text)
                .unwrap_or_else(|| "Not specified".into()),
            personal_impact: personal_impact
                .unwrap_or_else(|| "Please review the document details".into()),
            action_items: action_items.unwrap_or_else(|| vec!["No actions specified".into()]),
            benefits: raw.benefits.as_ref().and_then(as_list).unwrap_or_default(),
            deadlines: raw.deadlines.as_ref().and_then(as_list).unwrap_or_default(),
            trust_note: trust_note.unwrap_or_else(|| format!("Source confidence: {confidence}%")),
            document_type,
            voice_script: raw.voice_script.as_ref().and_then(as_text),
        };

        (result, Verdict::Explained)
    }
}

fn is_generic_title(title: &str, source_text: &str) -> bool {
    if GENERIC_TITLES.iter().any(|g| title.contains(g)) {
        return true;
    }
    title.contains("PM-KISAN") && !source_text.to_lowercase().contains("kisan")
}

/// Non-blank string, or a number rendered as text.
fn as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// String items of an array; `None` when the value is not an array.
fn as_list(value: &Value) -> Option<Vec<String>> {
    let Value::Array(items) = value else {
        return None;
    };
    Some(items.iter().filter_map(as_text).collect())
}
