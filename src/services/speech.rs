// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! Text-to-speech through the Murf API.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SpeechSettings;
use crate::domain::Language;
use crate::error::{Error, Result};

const DEFAULT_VOICE: &str = "en-US-alicia";

/// Built-in voice per language. Odia has no voice and falls back to English.
pub fn default_voice(language: Language) -> &'static str {
    match language {
        Language::En => DEFAULT_VOICE,
        Language::Hi => "hi-IN-aman",
        Language::Ta => "ta-IN-murali",
        Language::Gu => "gu-IN-suresh",
        Language::Mr => "mr-IN-ananya",
        Language::Or => DEFAULT_VOICE,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    voice_id: &'a str,
    text: &'a str,
    format: &'a str,
    channel_type: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    audio_file: Option<String>,
}

pub struct SpeechService {
    client: Client,
    api_key: Option<String>,
    api_url: String,
    format: String,
    voices: BTreeMap<String, String>,
}

impl SpeechService {
    pub fn new(settings: &SpeechSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: settings.api_key.clone().filter(|k| !k.trim().is_empty()),
            api_url: settings.api_url.clone(),
            format: settings.format.clone(),
            voices: settings.voices.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Voice for `language`, honouring config overrides.
    pub fn voice_for(&self, language: Language) -> &str {
        self.voices
            .get(language.code())
            .map(String::as_str)
            .unwrap_or_else(|| default_voice(language))
    }

    /// Synthesize `text` and return the audio bytes.
    pub async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Speech("text is required".into()));
        }

        let Some(ref api_key) = self.api_key else {
            return Err(Error::Speech("MURF_API_KEY not configured".into()));
        };

        let voice_id = self.voice_for(language);
        info!(voice = voice_id, chars = text.chars().count(), "requesting speech");

        let response = self
            .client
            .post(&self.api_url)
            .header("api-key", api_key)
            .header("Accept", "application/json")
            .json(&GenerateRequest {
                voice_id,
                text,
                format: &self.format,
                channel_type: "MONO",
            })
            .send()
            .await
            .map_err(|e| Error::Speech(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = %status, body = %body, "speech API error");
            return Err(Error::Speech(format!("Murf API error: {}", status.as_u16())));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Speech(format!("unexpected response: {e}")))?;

        let Some(audio_url) = generated.audio_file.filter(|u| !u.is_empty()) else {
            return Err(Error::Speech("no audio URL returned from Murf".into()));
        };

        debug!(url = %audio_url, "downloading audio");

        let audio = self
            .client
            .get(&audio_url)
            .send()
            .await
            .map_err(|e| Error::Speech(e.to_string()))?;

        if !audio.status().is_success() {
            return Err(Error::Speech(format!(
                "audio download failed: HTTP {}",
                audio.status().as_u16()
            )));
        }

        let bytes = audio
            .bytes()
            .await
            .map_err(|e| Error::Speech(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
