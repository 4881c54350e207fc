// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! OpenAI-compatible chat completions. Serves both Groq and OpenAI.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

use super::{LlmProvider, drain_lines, remaining_text};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::services::prompt::Prompt;

pub struct OpenAiProvider {
    client: Client,
    provider: String,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: Delta,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct Delta {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            provider: config.provider.to_string(),
            base_url: config.openai_base_url(),
            model: config.model.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Provider {
            provider: self.provider.clone(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate(
        &self,
        prompt: &Prompt,
        token_tx: mpsc::Sender<String>,
        cancel: CancellationToken,
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&ChatRequest {
                model: &self.model,
                messages: [
                    Message {
                        role: "system",
                        content: &prompt.system,
                    },
                    Message {
                        role: "user",
                        content: &prompt.user,
                    },
                ],
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                stream: true,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.error("request timed out")
                } else {
                    self.error(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(self.error(format!("HTTP {status}: {body}")));
        }

        let mut stream = response.bytes_stream();
        let mut full_response = String::new();
        let mut line_buffer: Vec<u8> = Vec::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(Error::Cancelled);
                }
                chunk = stream.next() => {
                    let Some(chunk) = chunk else { break };

                    let chunk = chunk.map_err(|e| {
                        if e.is_timeout() {
                            self.error("request timed out")
                        } else {
                            self.error(e.to_string())
                        }
                    })?;

                    line_buffer.extend_from_slice(&chunk);

                    for line in drain_lines(&mut line_buffer) {
                        if line == "data: [DONE]" {
                            return Ok(full_response.trim().to_string());
                        }

                        let Some(data) = line.strip_prefix("data:") else {
                            continue;
                        };

                        if let Ok(chunk) = serde_json::from_str::<ChatChunk>(data.trim()) {
                            for choice in &chunk.choices {
                                if let Some(ref content) = choice.delta.content {
                                    let _ = token_tx.send(content.clone()).await;
                                    full_response.push_str(content);
                                }
                                if choice.finish_reason.is_some() {
                                    return Ok(full_response.trim().to_string());
                                }
                            }
                        }
                    }
                }
            }
        }

        // Final event without a trailing newline
        let tail = remaining_text(&line_buffer);
        if let Some(data) = tail.strip_prefix("data:")
            && let Ok(chunk) = serde_json::from_str::<ChatChunk>(data.trim())
        {
            for choice in chunk.choices {
                if let Some(content) = choice.delta.content {
                    full_response.push_str(&content);
                }
            }
        }

        Ok(full_response.trim().to_string())
    }

    async fn verify(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(self.error("API key not configured"));
        }

        let url = format!("{}/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| self.error(e.to_string()))?;

        match response.status() {
            reqwest::StatusCode::UNAUTHORIZED => Err(self.error("invalid API key")),
            status if !status.is_success() => Err(self.error(format!("HTTP {status}"))),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        &self.provider
    }
}
