// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use civic_translator::config::{Config, Provider};
use civic_translator::domain::Language;

// ─── Default values ──────────────────────────────────────────────────────────

#[test]
fn default_config_values() {
    let config = Config::default();
    assert_eq!(config.provider, Provider::Groq);
    assert_eq!(config.model, "llama-3.3-70b-versatile");
    assert_eq!(config.ollama_host, "http://localhost:11434");
    assert!(config.api_key.is_none());
    assert!(config.base_url.is_none());
    assert_eq!(config.timeout_secs, 30);
    assert_eq!(config.request_timeout_secs, 60);
    assert!((config.temperature - 0.1).abs() < f32::EPSILON);
    assert_eq!(config.max_tokens, 2000);
    assert_eq!(config.max_file_bytes, 10 * 1024 * 1024);
    assert_eq!(config.max_document_chars, 24_000);
    assert_eq!(config.language, Language::En);
    assert!(config.llm.enabled);
    assert_eq!(config.web.timeout_secs, 10);
    assert_eq!(config.web.max_chars, 15_000);
    assert_eq!(config.screening.scam_threshold, 2);
    assert_eq!(config.speech.format, "MP3");
    assert_eq!(config.speech.api_url, "https://api.murf.ai/v1/speech/generate");
    assert!(config.validate().is_ok());
}

// ─── TOML deserialization ────────────────────────────────────────────────────

#[test]
fn load_from_valid_toml() {
    let toml_str = r#"
provider = "ollama"
model = "llama3:8b"
language = "ta"
max_document_chars = 16000

[llm]
enabled = false

[screening]
scam_threshold = 3
extra_scam_keywords = ["kyc update pending"]

[speech]
format = "WAV"

[speech.voices]
ta = "ta-IN-iniya"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.provider, Provider::Ollama);
    assert_eq!(config.model, "llama3:8b");
    assert_eq!(config.language, Language::Ta);
    assert_eq!(config.max_document_chars, 16_000);
    assert!(!config.llm.enabled);
    assert_eq!(config.screening.scam_threshold, 3);
    assert_eq!(config.screening.extra_scam_keywords, vec!["kyc update pending"]);
    assert_eq!(config.speech.format, "WAV");
    assert_eq!(
        config.speech.voices.get("ta").map(String::as_str),
        Some("ta-IN-iniya")
    );
}

#[test]
fn load_partial_toml_uses_defaults() {
    let config: Config = toml::from_str(r#"model = "gpt-4o-mini""#).unwrap();
    assert_eq!(config.model, "gpt-4o-mini");
    // Everything else should be default
    assert_eq!(config.provider, Provider::Groq);
    assert_eq!(config.web.max_chars, 15_000);
    assert!(config.llm.enabled);
}

#[test]
fn empty_toml_uses_all_defaults() {
    let config: Config = toml::from_str("").unwrap();
    let default = Config::default();
    assert_eq!(config.provider, default.provider);
    assert_eq!(config.model, default.model);
    assert_eq!(config.max_file_bytes, default.max_file_bytes);
}

#[test]
fn invalid_toml_returns_error() {
    let result: std::result::Result<Config, _> = toml::from_str("provider = [invalid");
    assert!(result.is_err(), "invalid TOML should return an error");
}

#[test]
fn unknown_language_is_rejected() {
    let result: std::result::Result<Config, _> = toml::from_str(r#"language = "fr""#);
    assert!(result.is_err());
}

// ─── Provider ─────────────────────────────────────────────────────────────────

#[test]
fn provider_display_format() {
    assert_eq!(format!("{}", Provider::Groq), "groq");
    assert_eq!(format!("{}", Provider::OpenAI), "openai");
    assert_eq!(format!("{}", Provider::Ollama), "ollama");
}

#[test]
fn provider_parse_is_lenient() {
    assert_eq!(Provider::parse(" OpenAI "), Some(Provider::OpenAI));
    assert_eq!(Provider::parse("groq"), Some(Provider::Groq));
    assert_eq!(Provider::parse("anthropic"), None);
}

#[test]
fn provider_key_variables() {
    assert_eq!(Provider::Groq.key_env_var(), Some("GROQ_API_KEY"));
    assert_eq!(Provider::OpenAI.key_env_var(), Some("OPENAI_API_KEY"));
    assert_eq!(Provider::Ollama.key_env_var(), None);
}

#[test]
fn base_url_depends_on_provider() {
    let groq = Config::default();
    assert_eq!(groq.openai_base_url(), "https://api.groq.com/openai/v1");

    let openai = Config {
        provider: Provider::OpenAI,
        ..Config::default()
    };
    assert_eq!(openai.openai_base_url(), "https://api.openai.com/v1");

    let custom = Config {
        base_url: Some("http://localhost:8080/v1/".into()),
        ..Config::default()
    };
    assert_eq!(custom.openai_base_url(), "http://localhost:8080/v1");
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[test]
fn out_of_range_values_fail_validation() {
    let cases = [
        Config {
            timeout_secs: 0,
            ..Config::default()
        },
        Config {
            request_timeout_secs: 4000,
            ..Config::default()
        },
        Config {
            temperature: 2.5,
            ..Config::default()
        },
        Config {
            max_file_bytes: 10,
            ..Config::default()
        },
        Config {
            max_document_chars: 10,
            ..Config::default()
        },
    ];

    for config in cases {
        assert!(config.validate().is_err(), "expected invalid: {config:?}");
    }
}

#[test]
fn zero_scam_threshold_fails_validation() {
    let mut config = Config::default();
    config.screening.scam_threshold = 0;
    assert!(config.validate().is_err());
}

#[test]
fn non_http_endpoints_fail_validation() {
    let config = Config {
        ollama_host: "localhost:11434".into(),
        ..Config::default()
    };
    assert!(config.validate().is_err());

    let config = Config {
        base_url: Some("file:///etc/passwd".into()),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn voice_overrides_need_known_language_codes() {
    let mut config = Config::default();
    config
        .speech
        .voices
        .insert("hi".into(), "hi-IN-shweta".into());
    assert!(config.validate().is_ok());

    config
        .speech
        .voices
        .insert("hindi".into(), "hi-IN-shweta".into());
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("hindi"), "got: {err}");
}

// ─── Key requirements ─────────────────────────────────────────────────────────

#[test]
fn cloud_provider_needs_key_only_when_llm_enabled() {
    let mut config = Config::default();
    assert!(config.ensure_llm_ready().is_err());

    config.llm.enabled = false;
    assert!(config.ensure_llm_ready().is_ok());

    let config = Config {
        api_key: Some("gsk_test".into()),
        ..Config::default()
    };
    assert!(config.ensure_llm_ready().is_ok());
}

#[test]
fn ollama_needs_no_key() {
    let config = Config {
        provider: Provider::Ollama,
        ..Config::default()
    };
    assert!(config.ensure_llm_ready().is_ok());
}
