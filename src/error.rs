// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

// miette's Diagnostic derive generates code that triggers this false positive
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::AnalysisStatus;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("No document given")]
    #[diagnostic(
        code(civic::input::missing),
        help("Pass a file path, `-` for stdin, --text \"...\" or --url https://...")
    )]
    NoInput,

    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    #[diagnostic(
        code(civic::input::too_large),
        help("Please use a document smaller than 10MB, or raise max_file_bytes")
    )]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Unsupported input: {0}")]
    #[diagnostic(
        code(civic::input::unsupported),
        help("Images are not read. Paste the document text with --text, or use a PDF with embedded text")
    )]
    UnsupportedInput(String),

    #[error("The document contains no readable text")]
    #[diagnostic(
        code(civic::input::empty),
        help("Check that the file is not a scan without a text layer")
    )]
    EmptyDocument,

    #[error("Invalid URL '{0}'")]
    #[diagnostic(
        code(civic::web::invalid_url),
        help("Only http:// and https:// addresses can be fetched")
    )]
    InvalidUrl(String),

    #[error("Failed to fetch {url}: {message}")]
    #[diagnostic(code(civic::web::fetch))]
    UrlFetch { url: String, message: String },

    #[error("Cannot connect to Ollama at {host}")]
    #[diagnostic(
        code(civic::ollama::not_running),
        help("Start Ollama with: ollama serve")
    )]
    OllamaNotRunning { host: String },

    #[error("Model '{model}' not found. Available: {}", available.join(", "))]
    #[diagnostic(
        code(civic::ollama::model_not_found),
        help("Pull the model with: ollama pull {model}")
    )]
    ModelNotFound {
        model: String,
        available: Vec<String>,
    },

    #[error("Provider '{provider}' error: {message}")]
    #[diagnostic(code(civic::provider::error))]
    Provider { provider: String, message: String },

    #[error("Could not read the model reply: {0}")]
    #[diagnostic(code(civic::reply::malformed))]
    MalformedReply(String),

    #[error("Speech error: {0}")]
    #[diagnostic(
        code(civic::speech::error),
        help("Set MURF_API_KEY or [speech] api_key in the config file")
    )]
    Speech(String),

    #[error("Cannot move analysis from {from} to {to}")]
    #[diagnostic(code(civic::status::transition))]
    InvalidTransition {
        from: AnalysisStatus,
        to: AnalysisStatus,
    },

    #[error("Request timed out after {secs} seconds")]
    #[diagnostic(
        code(civic::pipeline::timeout),
        help("The provider might be overloaded. Try again, or raise request_timeout_secs")
    )]
    Timeout { secs: u64 },

    #[error("The analysis could not be completed")]
    #[diagnostic(code(civic::pipeline::failed))]
    AnalysisFailed,

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error("Configuration error: {0}")]
    #[diagnostic(code(civic::config::error))]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[cfg(feature = "secure-storage")]
    #[error("Keyring error: {0}")]
    #[diagnostic(
        code(civic::keyring::error),
        help("Check your system keychain configuration")
    )]
    Keyring(String),
}

impl From<dialoguer::Error> for Error {
    fn from(e: dialoguer::Error) -> Self {
        Error::Dialog(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
