// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::path::Path;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::{
    Analysis, AnalysisMetadata, AnalysisResult, AnalysisSession, AnalysisStatus, DocumentInput,
    SourceKind, UserContext, Verdict,
};
use crate::error::{Error, Result};
use crate::services::extract::{self, ExtractedDocument};
use crate::services::llm::{self, LlmProvider};
use crate::services::prompt::{Prompt, PromptBuilder};
use crate::services::reply::ReplyParser;
use crate::services::screening::{Screener, ScreeningVerdict};
use crate::services::web::WebFetcher;

/// Reads a document, screens it, and (unless disabled) asks the model for
/// the seven-point explanation, reporting each stage on the session.
pub struct AnalysisPipeline {
    screener: Screener,
    fetcher: WebFetcher,
    provider: Option<Box<dyn LlmProvider>>,
    max_file_bytes: u64,
    max_document_chars: usize,
    request_timeout: Duration,
}

impl AnalysisPipeline {
    pub fn new(config: &Config) -> Self {
        let provider = config.llm.enabled.then(|| llm::create_provider(config));
        Self::with_provider(config, provider)
    }

    pub fn with_provider(config: &Config, provider: Option<Box<dyn LlmProvider>>) -> Self {
        Self {
            screener: Screener::new(&config.screening),
            fetcher: WebFetcher::new(&config.web).with_body_limit(config.max_file_bytes),
            provider,
            max_file_bytes: config.max_file_bytes,
            max_document_chars: config.max_document_chars,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.name())
    }

    pub fn build_prompt(&self, text: &str, context: &UserContext) -> Prompt {
        PromptBuilder::build(text, context, self.max_document_chars)
    }

    /// Run the whole analysis within the request timeout.
    pub async fn run(
        &self,
        input: &DocumentInput,
        context: &UserContext,
        session: &mut AnalysisSession,
        token_tx: mpsc::Sender<String>,
        cancel: CancellationToken,
    ) -> Result<Analysis> {
        session.begin();

        let outcome = tokio::time::timeout(
            self.request_timeout,
            self.run_stages(input, context, session, token_tx, cancel),
        )
        .await;

        let err = match outcome {
            Ok(Ok(analysis)) => return Ok(analysis),
            Ok(Err(e)) => e,
            Err(_) => Error::Timeout {
                secs: self.request_timeout.as_secs(),
            },
        };

        if session.status().is_running() {
            session.fail(AnalysisResult::pipeline_error(&err.to_string()))?;
        }
        Err(err)
    }

    async fn run_stages(
        &self,
        input: &DocumentInput,
        context: &UserContext,
        session: &mut AnalysisSession,
        token_tx: mpsc::Sender<String>,
        cancel: CancellationToken,
    ) -> Result<Analysis> {
        let request_id = new_request_id();
        info!(request_id = %request_id, input = %input.describe(), "analysis started");

        let document = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            document = self.read_input(input) => document?,
        };
        let metadata = AnalysisMetadata {
            request_id: request_id.clone(),
            source: document.source,
            source_confidence: document.confidence,
            extracted_text_length: document.char_count(),
        };
        debug!(
            request_id = %request_id,
            chars = metadata.extracted_text_length,
            "document read"
        );

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        session.advance(AnalysisStatus::Classifying)?;
        let report = self.screener.scan(&document.text);
        match report.verdict {
            ScreeningVerdict::IdentityDocument => {
                warn!(request_id = %request_id, matches = ?report.identity_matches, "identity document blocked");
                session.fail(AnalysisResult::identity_block())?;
                return Ok(finish(session, Verdict::IdentityBlocked, metadata));
            }
            ScreeningVerdict::LikelyScam => {
                warn!(request_id = %request_id, matches = ?report.scam_matches, "scam indicators found");
                session.fail(AnalysisResult::scam_warning())?;
                return Ok(finish(session, Verdict::ScamWarning, metadata));
            }
            ScreeningVerdict::Clear => {}
        }

        let Some(ref provider) = self.provider else {
            session.advance(AnalysisStatus::Simplifying)?;
            session.advance(AnalysisStatus::Translating)?;
            session.complete(AnalysisResult::screening_passed(document.confidence))?;
            return Ok(finish(session, Verdict::Explained, metadata));
        };

        session.advance(AnalysisStatus::Simplifying)?;
        let prompt = self.build_prompt(&document.text, context);
        info!(
            request_id = %request_id,
            provider = provider.name(),
            language = %context.language,
            prompt_chars = prompt.user.len(),
            "calling language model"
        );

        let raw = match provider.generate(&prompt, token_tx, cancel).await {
            Ok(raw) => raw,
            Err(Error::Cancelled) => return Err(Error::Cancelled),
            Err(e) => {
                warn!(request_id = %request_id, error = %e, "language model call failed");
                session.fail(AnalysisResult::pipeline_error(&e.to_string()))?;
                return Ok(finish(session, Verdict::Failed, metadata));
            }
        };
        debug!(request_id = %request_id, reply_len = raw.len(), "reply received");

        session.advance(AnalysisStatus::Translating)?;
        let verdict = match ReplyParser::parse(&raw, &document.text, document.confidence) {
            Ok((result, Verdict::Explained)) => {
                session.complete(result)?;
                Verdict::Explained
            }
            Ok((result, verdict)) => {
                session.fail(result)?;
                verdict
            }
            Err(e) => {
                warn!(request_id = %request_id, error = %e, "reply could not be parsed");
                session.fail(AnalysisResult::pipeline_error(&e.to_string()))?;
                Verdict::Failed
            }
        };

        info!(request_id = %request_id, verdict = ?verdict, "analysis finished");
        Ok(finish(session, verdict, metadata))
    }

    /// Turn any input into readable text.
    pub async fn read_input(&self, input: &DocumentInput) -> Result<ExtractedDocument> {
        match input {
            DocumentInput::File(path) => {
                let size = tokio::fs::metadata(path).await?.len();
                if size > self.max_file_bytes {
                    return Err(Error::FileTooLarge {
                        size,
                        limit: self.max_file_bytes,
                    });
                }
                let data = tokio::fs::read(path).await?;
                self.read_bytes(&file_name(path), &data).await
            }
            DocumentInput::Bytes { name, data } => self.read_bytes(name, data).await,
            DocumentInput::Text(text) => {
                if extract::looks_like_url(text) {
                    return self.fetch(text).await;
                }
                let size = text.len() as u64;
                if size > self.max_file_bytes {
                    return Err(Error::FileTooLarge {
                        size,
                        limit: self.max_file_bytes,
                    });
                }
                extract::check_readable(ExtractedDocument::new(
                    text.as_str(),
                    100.0,
                    SourceKind::Text,
                ))
            }
            DocumentInput::Url(url) => self.fetch(url).await,
        }
    }

    async fn read_bytes(&self, name: &str, data: &[u8]) -> Result<ExtractedDocument> {
        let document = extract::extract_text(name, data, self.max_file_bytes)?;
        // A text file holding nothing but a link stands for that page
        if document.source == SourceKind::File && extract::looks_like_url(&document.text) {
            return self.fetch(&document.text).await;
        }
        Ok(document)
    }

    async fn fetch(&self, url: &str) -> Result<ExtractedDocument> {
        let document = self.fetcher.fetch(url.trim()).await?;
        extract::check_readable(document)
    }
}

fn finish(session: &AnalysisSession, verdict: Verdict, metadata: AnalysisMetadata) -> Analysis {
    Analysis {
        status: session.status(),
        verdict,
        result: session
            .result()
            .cloned()
            .unwrap_or_else(|| AnalysisResult::pipeline_error("no result produced")),
        metadata,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Short id for correlating log lines of one analysis.
pub fn new_request_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}
