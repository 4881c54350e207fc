// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub mod ollama;
pub mod openai;

use crate::config::{Config, Provider};
use crate::error::Result;
use crate::services::prompt::Prompt;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate with streaming tokens and cancellation support
    async fn generate(
        &self,
        prompt: &Prompt,
        token_tx: mpsc::Sender<String>,
        cancel: CancellationToken,
    ) -> Result<String>;

    /// Check that the provider is reachable and usable
    async fn verify(&self) -> Result<()>;

    fn name(&self) -> &str;
}

pub fn create_provider(config: &Config) -> Box<dyn LlmProvider> {
    match config.provider {
        Provider::Groq | Provider::OpenAI => Box::new(openai::OpenAiProvider::new(config)),
        Provider::Ollama => Box::new(ollama::OllamaProvider::new(config)),
    }
}

/// Pop complete lines off a streaming buffer. Chunks from `bytes_stream()`
/// are not aligned to newlines or to UTF-8 boundaries, so raw bytes are kept
/// until a line is complete and only whole lines are decoded.
pub(crate) fn drain_lines(buffer: &mut Vec<u8>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
        let line: Vec<u8> = buffer.drain(..=newline_pos).collect();
        let line = String::from_utf8_lossy(&line);
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    lines
}

/// Whatever is left in the buffer once the stream ends.
pub(crate) fn remaining_text(buffer: &[u8]) -> String {
    String::from_utf8_lossy(buffer).trim().to_string()
}
