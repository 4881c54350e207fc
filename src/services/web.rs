// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::time::Duration;

use reqwest::Client;
use reqwest::header::USER_AGENT;
use reqwest::redirect::Policy;
use scraper::{ElementRef, Html, Node};
use tokio_stream::StreamExt;
use tracing::{debug, info};

use crate::config::WebSettings;
use crate::domain::SourceKind;
use crate::error::{Error, Result};
use crate::services::extract::ExtractedDocument;

/// Elements whose content is never document text.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "nav", "footer", "header", "noscript"];

const MAX_REDIRECTS: usize = 10;

/// Body limit when the caller sets none.
pub const DEFAULT_BODY_LIMIT: u64 = 10 * 1024 * 1024;

pub struct WebFetcher {
    client: Client,
    user_agent: String,
    max_chars: usize,
    max_bytes: u64,
}

impl WebFetcher {
    pub fn new(settings: &WebSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            user_agent: settings.user_agent.clone(),
            max_chars: settings.max_chars,
            max_bytes: DEFAULT_BODY_LIMIT,
        }
    }

    /// Refuse pages whose body is larger than `max_bytes`.
    pub fn with_body_limit(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Fetch a page and return its readable text.
    pub async fn fetch(&self, raw_url: &str) -> Result<ExtractedDocument> {
        let url = validate_url(raw_url)?;
        info!(url = %url, "fetching page");

        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| Error::UrlFetch {
                url: url.to_string(),
                message: if e.is_timeout() {
                    "request timed out".into()
                } else {
                    e.to_string()
                },
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UrlFetch {
                url: url.to_string(),
                message: format!("HTTP {status}"),
            });
        }

        if let Some(size) = response.content_length()
            && size > self.max_bytes
        {
            return Err(Error::FileTooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        let mut stream = response.bytes_stream();
        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::UrlFetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;
            let size = (bytes.len() + chunk.len()) as u64;
            if size > self.max_bytes {
                return Err(Error::FileTooLarge {
                    size,
                    limit: self.max_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }
        let body = String::from_utf8_lossy(&bytes);

        let text = html_to_text(&body, self.max_chars);
        debug!(html_len = body.len(), text_chars = text.chars().count(), "page converted");

        Ok(ExtractedDocument::new(text, 100.0, SourceKind::Url))
    }
}

pub fn validate_url(raw: &str) -> Result<url::Url> {
    let url = url::Url::parse(raw.trim()).map_err(|_| Error::InvalidUrl(raw.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}

/// Readable text of an HTML page, at most `max_chars` characters.
///
/// Text nodes are joined with a space, then every line is trimmed and split
/// on runs of two spaces; the non-empty phrases become lines.
pub fn html_to_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);

    let mut text = String::new();
    collect_text(document.root_element(), &mut text);

    let cleaned = text
        .lines()
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    truncate_chars(&cleaned, max_chars)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text(child, out);
                }
            }
            _ => {}
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
