// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use serde::{Deserialize, Serialize};

use super::AnalysisStatus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Identity,
    Scheme,
    Notice,
    Letter,
    Certificate,
    Advisory,
    NonGovernment,
    LowQuality,
    Scam,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Scheme => "scheme",
            Self::Notice => "notice",
            Self::Letter => "letter",
            Self::Certificate => "certificate",
            Self::Advisory => "advisory",
            Self::NonGovernment => "non_government",
            Self::LowQuality => "low_quality",
            Self::Scam => "scam",
            Self::Unknown => "unknown",
        }
    }

    /// Lenient parse of a model-supplied tag. `identity_block` is what the
    /// screening layer used to emit and still shows up in replies.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "identity" | "identity_block" | "id_card" => Self::Identity,
            "scheme" => Self::Scheme,
            "notice" => Self::Notice,
            "letter" => Self::Letter,
            "certificate" => Self::Certificate,
            "advisory" => Self::Advisory,
            "non_government" => Self::NonGovernment,
            "low_quality" => Self::LowQuality,
            "scam" => Self::Scam,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The seven-point explanation of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub title: String,
    /// 1. What is this document about?
    pub summary: String,
    /// 2. Who should pay attention to this?
    pub target_audience: String,
    /// 3. What does this mean for you?
    pub personal_impact: String,
    /// 4. What action should you take?
    pub action_items: Vec<String>,
    /// 5. Benefits or consequences
    pub benefits: Vec<String>,
    /// 6. Important dates
    pub deadlines: Vec<String>,
    /// 7. Source & trust note
    pub trust_note: String,
    pub document_type: DocumentType,
    #[serde(
        rename = "voice_script",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub voice_script: Option<String>,
}

impl AnalysisResult {
    pub fn identity_block() -> Self {
        Self {
            title: "Identity Document Detected".into(),
            summary: "This appears to be a personal identity document (like Aadhaar, PAN, or Voter ID). Private documents cannot be summarized.".into(),
            target_audience: "N/A".into(),
            personal_impact: "For your privacy and safety, we do not process or store identity documents.".into(),
            action_items: vec![
                "Please do not upload personal IDs.".into(),
                "Use official government portals (UIDAI, NSDL) for ID-related queries.".into(),
            ],
            benefits: Vec::new(),
            deadlines: Vec::new(),
            trust_note: "🔒 Privacy protection active: identity document blocked.".into(),
            document_type: DocumentType::Identity,
            voice_script: Some(
                "This is a private identity document. Private documents cannot be summarized."
                    .into(),
            ),
        }
    }

    pub fn scam_warning() -> Self {
        Self {
            title: "⚠️ Potential Scam Detected".into(),
            summary: "This document shows characteristics of fraudulent content.".into(),
            target_audience: "Anyone who received this document".into(),
            personal_impact: "DO NOT share personal information or make any payments.".into(),
            action_items: vec![
                "Do not respond to this document".into(),
                "Do not share personal details (Aadhaar, bank account, OTP)".into(),
                "Report to cybercrime.gov.in".into(),
                "Verify with official government websites".into(),
            ],
            benefits: Vec::new(),
            deadlines: Vec::new(),
            trust_note: "⚠️ FRAUD WARNING: This document failed authenticity checks.".into(),
            document_type: DocumentType::Scam,
            voice_script: Some(
                "Warning. This document shows signs of being a scam or fraud. Do not share your personal information. Do not send money."
                    .into(),
            ),
        }
    }

    pub fn unreadable() -> Self {
        Self {
            title: "Document Not Readable".into(),
            summary: "No readable text could be found in this document.".into(),
            target_audience: "N/A".into(),
            personal_impact: "We could not explain this document because its text is missing or unclear.".into(),
            action_items: vec![
                "Check document quality".into(),
                "Try a clearer copy, or paste the text directly".into(),
            ],
            benefits: Vec::new(),
            deadlines: Vec::new(),
            trust_note: "Nothing was guessed or filled in.".into(),
            document_type: DocumentType::LowQuality,
            voice_script: None,
        }
    }

    /// Used when the model answers with placeholder content instead of the
    /// document's own words.
    pub fn generic_fallback() -> Self {
        Self {
            title: "Document Analysis".into(),
            summary: "Unable to extract specific information from the provided document.".into(),
            target_audience: "Document reader".into(),
            personal_impact: "Please ensure the document text is clear and readable.".into(),
            action_items: vec![
                "Verify document quality".into(),
                "Try uploading a clearer version".into(),
            ],
            benefits: Vec::new(),
            deadlines: Vec::new(),
            trust_note: "Could not identify specific document details from the provided text."
                .into(),
            document_type: DocumentType::NonGovernment,
            voice_script: None,
        }
    }

    pub fn pipeline_error(reason: &str) -> Self {
        Self {
            title: "Analysis Error".into(),
            summary: format!("Failed to analyze: {reason}"),
            target_audience: "N/A".into(),
            personal_impact: "The analysis pipeline encountered an issue.".into(),
            action_items: vec![
                "Check document quality".into(),
                "Check your internet connection (needed for the language model)".into(),
                "Run `civic-translator doctor` to check the provider setup".into(),
            ],
            benefits: Vec::new(),
            deadlines: Vec::new(),
            trust_note: "Technical error in pipeline".into(),
            document_type: DocumentType::Unknown,
            voice_script: None,
        }
    }

    /// Result of a screening-only run on a document with no warning signs.
    pub fn screening_passed(source_confidence: f32) -> Self {
        Self {
            title: "Screening Passed".into(),
            summary: "No identity-document or scam indicators were found. The document was not sent for a full explanation.".into(),
            target_audience: "Not specified".into(),
            personal_impact: "Run again without --no-llm for a plain-language explanation.".into(),
            action_items: vec!["No actions specified".into()],
            benefits: Vec::new(),
            deadlines: Vec::new(),
            trust_note: format!("Source confidence: {source_confidence}%"),
            document_type: DocumentType::Unknown,
            voice_script: None,
        }
    }

    /// Text read aloud: the model's script, else title and summary.
    pub fn speech_script(&self) -> String {
        match self.voice_script.as_deref().map(str::trim) {
            Some(script) if !script.is_empty() => script.to_string(),
            _ => format!("{}. {}.", self.title, self.summary),
        }
    }
}

/// How an analysis ended, independent of the result text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Explained,
    IdentityBlocked,
    ScamWarning,
    Unreadable,
    Failed,
}

impl Verdict {
    pub fn is_warning(&self) -> bool {
        !matches!(self, Self::Explained)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Pdf,
    Text,
    Url,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub request_id: String,
    pub source: SourceKind,
    pub source_confidence: f32,
    pub extracted_text_length: usize,
}

/// One finished run of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub status: AnalysisStatus,
    pub verdict: Verdict,
    pub result: AnalysisResult,
    pub metadata: AnalysisMetadata,
}
