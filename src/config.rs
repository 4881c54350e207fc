// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::domain::Language;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Groq,
    OpenAI,
    Ollama,
}

impl Provider {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Some(Self::Groq),
            "openai" => Some(Self::OpenAI),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    /// Environment variable holding this provider's key, if it needs one.
    pub fn key_env_var(&self) -> Option<&'static str> {
        match self {
            Self::Groq => Some("GROQ_API_KEY"),
            Self::OpenAI => Some("OPENAI_API_KEY"),
            Self::Ollama => None,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Groq => write!(f, "groq"),
            Self::OpenAI => write!(f, "openai"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

/// Language model switch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Send screened documents to the language model (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// URL fetching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSettings {
    #[serde(default = "default_web_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum characters kept from a fetched page
    #[serde(default = "default_web_max_chars")]
    pub max_chars: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for WebSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_web_timeout_secs(),
            max_chars: default_web_max_chars(),
            user_agent: default_user_agent(),
        }
    }
}

/// Keyword screening
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningSettings {
    #[serde(default)]
    pub extra_identity_keywords: Vec<String>,

    #[serde(default)]
    pub extra_scam_keywords: Vec<String>,

    /// Distinct scam phrases needed for a fraud warning (default: 2)
    #[serde(default = "default_scam_threshold")]
    pub scam_threshold: usize,
}

impl Default for ScreeningSettings {
    fn default() -> Self {
        Self {
            extra_identity_keywords: Vec::new(),
            extra_scam_keywords: Vec::new(),
            scam_threshold: default_scam_threshold(),
        }
    }
}

/// Text-to-speech
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechSettings {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_speech_api_url")]
    pub api_url: String,

    /// Audio format requested from the speech API (default: MP3)
    #[serde(default = "default_speech_format")]
    pub format: String,

    /// Voice id overrides keyed by language code
    #[serde(default)]
    pub voices: BTreeMap<String, String>,

    #[serde(default = "default_speech_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_speech_api_url(),
            format: default_speech_format(),
            voices: BTreeMap::new(),
            timeout_secs: default_speech_timeout_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: Provider,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL for OpenAI-compatible APIs (default depends on provider)
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_ollama_host")]
    pub ollama_host: String,

    /// Language model request timeout in seconds (default 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Whole-analysis timeout in seconds (default 60)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// LLM temperature (0.0-2.0, default 0.1)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate (default 2000)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Largest accepted input file (default 10 MiB)
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Document characters included in the prompt (~4 chars per token)
    #[serde(default = "default_max_document_chars")]
    pub max_document_chars: usize,

    /// Explanation language when --language is not given
    #[serde(default)]
    pub language: Language,

    #[serde(default)]
    pub llm: LlmSettings,

    #[serde(default)]
    pub web: WebSettings,

    #[serde(default)]
    pub screening: ScreeningSettings,

    #[serde(default)]
    pub speech: SpeechSettings,
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".into()
}
fn default_ollama_host() -> String {
    "http://localhost:11434".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_request_timeout_secs() -> u64 {
    60
}
fn default_temperature() -> f32 {
    0.1
}
fn default_max_tokens() -> u32 {
    2000
}
fn default_max_file_bytes() -> u64 {
    10 * 1024 * 1024
}
fn default_max_document_chars() -> usize {
    24_000
}
fn default_web_timeout_secs() -> u64 {
    10
}
fn default_web_max_chars() -> usize {
    15_000
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".into()
}
fn default_scam_threshold() -> usize {
    2
}
fn default_speech_api_url() -> String {
    "https://api.murf.ai/v1/speech/generate".into()
}
fn default_speech_format() -> String {
    "MP3".into()
}
fn default_speech_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: default_model(),
            api_key: None,
            base_url: None,
            ollama_host: default_ollama_host(),
            timeout_secs: default_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_file_bytes: default_max_file_bytes(),
            max_document_chars: default_max_document_chars(),
            language: Language::default(),
            llm: LlmSettings::default(),
            web: WebSettings::default(),
            screening: ScreeningSettings::default(),
            speech: SpeechSettings::default(),
        }
    }
}

impl Config {
    /// Load with priority: CLI > ENV > user config > project config > defaults
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Project-level config (.civic.toml in the working directory)
        if let Ok(cwd) = std::env::current_dir() {
            let project_config = cwd.join(".civic.toml");
            if project_config.exists() {
                figment = figment.merge(Toml::file(&project_config));
            }
        }

        if let Some(path) = Self::config_path()
            && path.exists()
        {
            figment = figment.merge(Toml::file(&path));
        }

        // CIVIC_MODEL, CIVIC_PROVIDER, CIVIC_SPEECH__API_KEY, ...
        figment = figment.merge(Env::prefixed("CIVIC_").split("__"));

        let mut config: Config = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        // CLI provider first so the key lookups below use the right service
        config.apply_cli(cli)?;

        if config.api_key.is_none() {
            config.api_key = config
                .provider
                .key_env_var()
                .and_then(|var| std::env::var(var).ok());
        }
        if config.speech.api_key.is_none() {
            config.speech.api_key = std::env::var("MURF_API_KEY").ok();
        }

        #[cfg(feature = "secure-storage")]
        {
            if config.api_key.is_none() && config.provider != Provider::Ollama {
                config.api_key = keyring_lookup(&config.provider.to_string());
            }
            if config.speech.api_key.is_none() {
                config.speech.api_key = keyring_lookup("murf");
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "civic-translator").map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    fn apply_cli(&mut self, cli: &Cli) -> Result<()> {
        if let Some(ref p) = cli.provider {
            self.provider = Provider::parse(p).ok_or_else(|| {
                Error::Config(format!(
                    "unknown provider '{p}' (expected groq, openai or ollama)"
                ))
            })?;
        }
        if let Some(ref m) = cli.model {
            self.model = m.clone();
        }
        if let Some(language) = cli.language {
            self.language = language;
        }
        if cli.no_llm {
            self.llm.enabled = false;
        }
        Ok(())
    }

    /// OpenAI-compatible endpoint for the configured provider.
    pub fn openai_base_url(&self) -> String {
        let default = match self.provider {
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::OpenAI | Provider::Ollama => "https://api.openai.com/v1",
        };
        self.base_url
            .as_deref()
            .unwrap_or(default)
            .trim_end_matches('/')
            .to_string()
    }

    /// Checks needed only when a document is actually sent to the model.
    pub fn ensure_llm_ready(&self) -> Result<()> {
        if self.llm.enabled && self.provider != Provider::Ollama && self.api_key.is_none() {
            let var = self.provider.key_env_var().unwrap_or("CIVIC_API_KEY");
            return Err(Error::Config(format!(
                "{} requires an API key. Set CIVIC_API_KEY or {var}, or pass --no-llm",
                self.provider
            )));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=3600).contains(&self.timeout_secs) {
            return Err(Error::Config(format!(
                "timeout_secs must be 1–3600, got {}",
                self.timeout_secs
            )));
        }

        if !(1..=3600).contains(&self.request_timeout_secs) {
            return Err(Error::Config(format!(
                "request_timeout_secs must be 1–3600, got {}",
                self.request_timeout_secs
            )));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Config(format!(
                "temperature must be 0.0–2.0, got {}",
                self.temperature
            )));
        }

        if !(1024..=50 * 1024 * 1024).contains(&self.max_file_bytes) {
            return Err(Error::Config(format!(
                "max_file_bytes must be 1 KiB–50 MiB, got {}",
                self.max_file_bytes
            )));
        }

        if !(1_000..=200_000).contains(&self.max_document_chars) {
            return Err(Error::Config(format!(
                "max_document_chars must be 1000–200000, got {}",
                self.max_document_chars
            )));
        }

        if !(1_000..=200_000).contains(&self.web.max_chars) {
            return Err(Error::Config(format!(
                "web.max_chars must be 1000–200000, got {}",
                self.web.max_chars
            )));
        }

        if !(1..=3600).contains(&self.web.timeout_secs) {
            return Err(Error::Config(format!(
                "web.timeout_secs must be 1–3600, got {}",
                self.web.timeout_secs
            )));
        }

        if self.screening.scam_threshold == 0 {
            return Err(Error::Config(
                "screening.scam_threshold must be at least 1".into(),
            ));
        }

        if let Some(code) = self
            .speech
            .voices
            .keys()
            .find(|code| Language::parse(code).is_none())
        {
            return Err(Error::Config(format!(
                "speech.voices has unknown language code '{code}'"
            )));
        }

        check_http_url("ollama_host", &self.ollama_host)?;
        check_http_url("speech.api_url", &self.speech.api_url)?;
        if let Some(ref base_url) = self.base_url {
            check_http_url("base_url", base_url)?;
        }

        Ok(())
    }

    /// Create default config file with secure permissions
    pub fn create_default() -> Result<PathBuf> {
        let Some(dir) = Self::config_dir() else {
            return Err(Error::Config("Cannot determine config directory".into()));
        };

        fs::create_dir_all(&dir)?;

        let path = dir.join("config.toml");
        let content = r#"# Civic Translator Configuration

# LLM provider: groq, openai, ollama
provider = "groq"

# Model name
model = "llama-3.3-70b-versatile"

# Explanation language: en, hi, ta, or, mr, gu
language = "en"

# Ollama server URL (provider = "ollama")
ollama_host = "http://localhost:11434"

# Model request timeout and whole-analysis timeout, in seconds
timeout_secs = 30
request_timeout_secs = 60

# Largest accepted input file, in bytes
# max_file_bytes = 10485760

[llm]
# Set to false to only run keyword screening
enabled = true

[web]
timeout_secs = 10
max_chars = 15000

[screening]
# Distinct scam phrases needed for a fraud warning
scam_threshold = 2
# extra_scam_keywords = ["kyc update pending"]
# extra_identity_keywords = ["ration card number"]

[speech]
# api_key = "..."  (or MURF_API_KEY)
format = "MP3"

# [speech.voices]
# hi = "hi-IN-kabir"
"#;

        fs::write(&path, content)?;

        // Set secure permissions (0600)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(path)
    }
}

fn check_http_url(field: &str, value: &str) -> Result<()> {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(Error::Config(format!(
            "{field} must be an http:// or https:// URL, got '{value}'"
        ))),
    }
}

#[cfg(feature = "secure-storage")]
fn keyring_lookup(service: &str) -> Option<String> {
    keyring::Entry::new("civic-translator", service)
        .ok()
        .and_then(|entry| entry.get_password().ok())
}
