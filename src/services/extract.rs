// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

//! Text extraction from submitted files.

use std::path::Path;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info, warn};

use crate::domain::SourceKind;
use crate::error::{Error, Result};
use crate::services::web::html_to_text;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Text shorter than this is suspicious but still analyzed.
const SHORT_TEXT_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    pub text: String,
    /// How much the text can be trusted to match the document, in percent.
    pub confidence: f32,
    pub source: SourceKind,
}

impl ExtractedDocument {
    pub fn new(text: impl Into<String>, confidence: f32, source: SourceKind) -> Self {
        Self {
            text: text.into(),
            confidence,
            source,
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// A single `http://` or `https://` token, e.g. a pasted link.
pub fn looks_like_url(text: &str) -> bool {
    let text = text.trim();
    (text.starts_with("http://") || text.starts_with("https://"))
        && !text.is_empty()
        && text.split_whitespace().count() == 1
}

/// Read a stream such as stdin, refusing anything over `max_bytes`.
pub async fn read_limited<R: AsyncRead + Unpin>(reader: R, max_bytes: u64) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    reader
        .take(max_bytes.saturating_add(1))
        .read_to_end(&mut data)
        .await?;

    let size = data.len() as u64;
    if size > max_bytes {
        return Err(Error::FileTooLarge {
            size,
            limit: max_bytes,
        });
    }
    Ok(data)
}

/// Extract text from file bytes, dispatching on the file extension.
pub fn extract_text(file_name: &str, data: &[u8], max_bytes: u64) -> Result<ExtractedDocument> {
    let size = data.len() as u64;
    if size > max_bytes {
        return Err(Error::FileTooLarge {
            size,
            limit: max_bytes,
        });
    }

    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    debug!(file = file_name, extension = %extension, bytes = size, "extracting text");

    let document = match extension.as_str() {
        "pdf" => ExtractedDocument::new(extract_pdf_text(data)?, 90.0, SourceKind::Pdf),
        "html" | "htm" => {
            let html = String::from_utf8_lossy(data);
            ExtractedDocument::new(html_to_text(&html, usize::MAX), 100.0, SourceKind::File)
        }
        ext if IMAGE_EXTENSIONS.contains(&ext) => {
            return Err(Error::UnsupportedInput(format!(
                "{file_name} is an image; only documents with a text layer can be read"
            )));
        }
        _ => {
            let text = String::from_utf8(data.to_vec()).map_err(|_| {
                Error::UnsupportedInput(format!(
                    "unsupported file type: {}",
                    if extension.is_empty() { "binary" } else { extension.as_str() }
                ))
            })?;
            ExtractedDocument::new(text, 100.0, SourceKind::File)
        }
    };

    check_readable(document)
}

/// Trim the text and reject documents with nothing to read.
pub fn check_readable(mut document: ExtractedDocument) -> Result<ExtractedDocument> {
    let trimmed = document.text.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyDocument);
    }
    if trimmed.chars().count() < SHORT_TEXT_CHARS {
        warn!(text = trimmed, "very short text extracted");
    }
    if trimmed.len() != document.text.len() {
        document.text = trimmed.to_string();
    }
    Ok(document)
}

fn extract_pdf_text(data: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| Error::UnsupportedInput(format!("failed to read PDF text: {e}")))?;
    let cleaned = clean_extracted_text(&text);
    info!(chars = cleaned.len(), "PDF text extracted");
    Ok(cleaned)
}

/// Trim every line and drop the blank ones.
pub fn clean_extracted_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
