// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use crate::domain::UserContext;

/// Exact reply the model gives when there is nothing to read.
pub const NOT_READABLE_MARKER: &str = "DOCUMENT NOT READABLE";

pub const DOCUMENT_START: &str = "=== DOCUMENT TEXT START ===";
pub const DOCUMENT_END: &str = "=== DOCUMENT TEXT END ===";

const SYSTEM_PROMPT_TEMPLATE: &str = r#"You are a civic document reader. You explain government documents to ordinary citizens.

READING
Use only the document text between the markers in the user message.
If the text is empty or unreadable, reply with exactly: DOCUMENT NOT READABLE

GROUNDING (STRICT)
- Use ONLY the document text. Do not use prior knowledge.
- Do not assume the document is a government scheme.
- Never mention a scheme, programme or benefit unless it is written in the text.
- Never use placeholder names such as "PM Example Welfare Scheme".
- If something is missing, unreadable or unclear, say so. Never guess. Never auto-fill.

DOCUMENT TYPE
Name the document type only if it is clearly visible (notice, letter, certificate, scheme, advisory).
If it is unclear, say: "Document type not clearly mentioned."

WHAT TO EXTRACT
For an ID card: name, date of birth, gender, document number, address.
For a scheme or notice: objectives and features, eligibility, premiums or financial details,
risks covered, important dates, implementing agencies (national, state and district levels
when present), modes of implementation (insurance, trust, mixed).
For a website or portal: latest announcements, helpline and contact details, eligibility
exclusions.

EXPLANATION
Explain in very simple words, at a 10th-grade reading level, in short sentences, without
legal or bureaucratic language. When the document covers several topics or schemes, start
with an overview and give each its own points. Put the detailed points in "benefits".

LANGUAGE AND VOICE
Write every field in {language_name} (language code {language_code}).
Write a voice script in the same language that reads the title, then the summary, then
"Here are the important points:" followed by each point in order.

OUTPUT
Reply with a single JSON object and nothing else. No markdown fences.
{
  "type": "scheme" | "notice" | "letter" | "certificate" | "advisory" | "identity" | "non_government" | "unknown",
  "title": "Exact document title",
  "summary": "Simple explanation",
  "targetAudience": "Who this is for",
  "personalImpact": "What this means for the reader",
  "actionItems": ["Action 1", "Action 2"],
  "benefits": ["Important point 1", "Important point 2"],
  "deadlines": ["Deadline 1"],
  "trustNote": "What kind of document this appears to be and how sure you are",
  "voice_script": "Title... Summary... Here are the important points: ..."
}"#;

/// The two messages sent to the model for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Both messages, for `--show-prompt`.
    pub fn display(&self) -> String {
        format!("[system]\n{}\n\n[user]\n{}", self.system, self.user)
    }
}

pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build(text: &str, context: &UserContext, max_document_chars: usize) -> Prompt {
        let language = context.language;
        let system = SYSTEM_PROMPT_TEMPLATE
            .replace("{language_name}", language.english_name())
            .replace("{language_code}", language.code());

        let (document, truncated) = Self::truncate(text.trim(), max_document_chars);
        let truncation_note = if truncated {
            "\n(The document was longer than shown; explain only the part above.)"
        } else {
            ""
        };

        let user = format!(
            r#"Read this EXACT document text and analyze ONLY what is written:

{DOCUMENT_START}
{document}
{DOCUMENT_END}{truncation_note}

User context:
- Occupation: {occupation}
- Location: {location}
- Age: {age}
- Language: {language_name} ({language_code}); translate the output to this language

Extract ONLY information that is explicitly written. If information is missing, say "Not specified in document".
Return JSON only."#,
            occupation = context.occupation_or_na(),
            location = context.location_or_na(),
            age = context.age_or_na(),
            language_name = language.english_name(),
            language_code = language.code(),
        );

        Prompt { system, user }
    }

    /// Cut to at most `max_chars` characters, preferring a line boundary.
    fn truncate(text: &str, max_chars: usize) -> (&str, bool) {
        let Some((byte_idx, _)) = text.char_indices().nth(max_chars) else {
            return (text, false);
        };
        let head = &text[..byte_idx];
        match head.rfind('\n') {
            Some(nl) if nl > byte_idx / 2 => (&head[..nl], true),
            _ => (head, true),
        }
    }
}
