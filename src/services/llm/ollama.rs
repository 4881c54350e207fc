// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

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

pub struct OllamaProvider {
    client: Client,
    host: String,
    model: String,
    temperature: f32,
    num_predict: u32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    format: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
    done: bool,
}

#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Deserialize)]
struct ModelInfo {
    name: String,
}

impl OllamaProvider {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            // Sanitize: remove trailing slashes to avoid //api/generate
            host: config.ollama_host.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            num_predict: config.max_tokens,
        }
    }

    /// Names of the models the server has pulled.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.host);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|_| Error::OllamaNotRunning {
                host: self.host.clone(),
            })?;

        if !response.status().is_success() {
            return Err(Error::Provider {
                provider: "ollama".into(),
                message: format!("HTTP {}", response.status()),
            });
        }

        let tags: TagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(
        &self,
        prompt: &Prompt,
        token_tx: mpsc::Sender<String>,
        cancel: CancellationToken,
    ) -> Result<String> {
        let url = format!("{}/api/generate", self.host);

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                system: &prompt.system,
                prompt: &prompt.user,
                format: "json",
                stream: true,
                options: GenerateOptions {
                    temperature: self.temperature,
                    num_predict: self.num_predict,
                },
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    Error::OllamaNotRunning {
                        host: self.host.clone(),
                    }
                } else {
                    Error::Provider {
                        provider: "ollama".into(),
                        message: if e.is_timeout() {
                            "request timed out".into()
                        } else {
                            e.to_string()
                        },
                    }
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider {
                provider: "ollama".into(),
                message: format!("HTTP {status}: {body}"),
            });
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

                    let chunk = chunk.map_err(|e| Error::Provider {
                        provider: "ollama".into(),
                        message: e.to_string(),
                    })?;

                    line_buffer.extend_from_slice(&chunk);

                    // Newline-delimited JSON
                    for line in drain_lines(&mut line_buffer) {
                        if let Ok(resp) = serde_json::from_str::<GenerateResponse>(&line) {
                            let _ = token_tx.send(resp.response.clone()).await;
                            full_response.push_str(&resp.response);

                            if resp.done {
                                return Ok(full_response.trim().to_string());
                            }
                        }
                    }
                }
            }
        }

        if let Ok(resp) = serde_json::from_str::<GenerateResponse>(&remaining_text(&line_buffer)) {
            full_response.push_str(&resp.response);
        }

        Ok(full_response.trim().to_string())
    }

    async fn verify(&self) -> Result<()> {
        let available = self.list_models().await?;

        // "llama3" matches "llama3:latest"
        let found = available
            .iter()
            .any(|m| m == &self.model || m.split(':').next() == Some(self.model.as_str()));

        if !found {
            return Err(Error::ModelNotFound {
                model: self.model.clone(),
                available,
            });
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
