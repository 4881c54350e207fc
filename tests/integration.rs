// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! Integration tests for LLM providers feeding the reply parser.
//!
//! Uses `wiremock` to mock HTTP endpoints so no real LLM servers are needed.

mod helpers;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use civic_translator::config::{Config, Provider};
use civic_translator::domain::{DocumentType, Language, UserContext, Verdict};
use civic_translator::error::Error;
use civic_translator::services::llm::LlmProvider;
use civic_translator::services::llm::ollama::OllamaProvider;
use civic_translator::services::llm::openai::OpenAiProvider;
use civic_translator::services::prompt::{Prompt, PromptBuilder};
use civic_translator::services::reply::ReplyParser;
use helpers::{
    SCHEME_NOTICE, drain_tokens, ollama_config, openai_config, serve_in_chunks, split_inside,
};

fn test_prompt() -> Prompt {
    PromptBuilder::build(SCHEME_NOTICE, &UserContext::new(Language::En), 24_000)
}

// ─── Ollama model verification ───────────────────────────────────────────────

#[tokio::test]
async fn ollama_lists_models() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": [
                {"name": "llama3:latest"},
                {"name": "qwen3:4b"}
            ]
        })))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(&ollama_config(&server.uri()));
    let models = provider.list_models().await.unwrap();

    assert_eq!(models, vec!["llama3:latest", "qwen3:4b"]);
    // "llama3" matches "llama3:latest"
    provider.verify().await.unwrap();
}

#[tokio::test]
async fn ollama_connection_refused() {
    // Use a port that is almost certainly not listening
    let provider = OllamaProvider::new(&ollama_config("http://127.0.0.1:1"));
    let result = provider.verify().await;

    let err = result.unwrap_err();
    assert!(
        matches!(err, Error::OllamaNotRunning { .. }),
        "expected OllamaNotRunning, got: {err:?}"
    );
}

#[tokio::test]
async fn ollama_model_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": [
                {"name": "mistral:7b"},
                {"name": "gemma:2b"}
            ]
        })))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(&ollama_config(&server.uri()));
    match provider.verify().await.unwrap_err() {
        Error::ModelNotFound { model, available } => {
            assert_eq!(model, "llama3");
            assert!(available.contains(&"mistral:7b".to_string()));
            assert!(available.contains(&"gemma:2b".to_string()));
        }
        other => panic!("expected ModelNotFound, got: {other:?}"),
    }
}

// ─── Ollama streaming response ───────────────────────────────────────────────

#[tokio::test]
async fn ollama_streaming_response() {
    let server = MockServer::start().await;

    // NDJSON streaming: each line is a separate JSON object
    let body = [
        r#"{"response":"{\"type\":\"notice\",","done":false}"#,
        r#"{"response":"\"title\":\"Water supply ","done":false}"#,
        r#"{"response":"notice\"}","done":true}"#,
        "",
    ]
    .join("\n");

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama3",
            "format": "json",
            "stream": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(&ollama_config(&server.uri()));
    let (tx, rx) = mpsc::channel(32);
    let cancel = CancellationToken::new();

    let result = provider.generate(&test_prompt(), tx, cancel).await.unwrap();
    assert_eq!(result, r#"{"type":"notice","title":"Water supply notice"}"#);

    let tokens = drain_tokens(rx).await;
    assert_eq!(tokens.len(), 3, "expected one token per stream line");

    let (explanation, verdict) = ReplyParser::parse(&result, SCHEME_NOTICE, 100.0).unwrap();
    assert_eq!(verdict, Verdict::Explained);
    assert_eq!(explanation.document_type, DocumentType::Notice);
    assert_eq!(explanation.title, "Water supply notice");
}

#[tokio::test]
async fn ollama_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(&ollama_config(&server.uri()));
    let (tx, _rx) = mpsc::channel(32);
    let cancel = CancellationToken::new();

    match provider.generate(&test_prompt(), tx, cancel).await.unwrap_err() {
        Error::Provider { provider, message } => {
            assert_eq!(provider, "ollama");
            assert!(
                message.contains("500"),
                "expected message to contain status code 500, got: {message}"
            );
        }
        other => panic!("expected Provider error, got: {other:?}"),
    }
}

// ─── OpenAI-compatible streaming response ─────────────────────────────────────

#[tokio::test]
async fn openai_streaming_response() {
    let server = MockServer::start().await;

    let body = [
        r#"data: {"choices":[{"delta":{"content":"{\"type\":\"letter\","},"finish_reason":null}]}"#,
        "",
        r#"data: {"choices":[{"delta":{"content":"\"title\":\"Pension letter\"}"},"finish_reason":"stop"}]}"#,
        "",
        "data: [DONE]",
        "",
    ]
    .join("\n");

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&openai_config(&server.uri()));
    let (tx, rx) = mpsc::channel(32);
    let cancel = CancellationToken::new();

    let result = provider.generate(&test_prompt(), tx, cancel).await.unwrap();
    assert_eq!(result, r#"{"type":"letter","title":"Pension letter"}"#);

    let tokens = drain_tokens(rx).await;
    assert_eq!(tokens.len(), 2);
}

#[tokio::test]
async fn openai_keeps_characters_split_across_chunks() {
    let body = "data: {\"choices\":[{\"delta\":{\"content\":\"नमस्ते\"},\"finish_reason\":null}]}\n\n\
                data: [DONE]\n\n";
    let base_url = serve_in_chunks(split_inside(body, 'न'));

    let provider = OpenAiProvider::new(&openai_config(&base_url));
    let (tx, rx) = mpsc::channel(32);
    let result = provider
        .generate(&test_prompt(), tx, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result, "नमस्ते");
    assert_eq!(drain_tokens(rx).await, vec!["नमस्ते"]);
}

#[tokio::test]
async fn ollama_keeps_characters_split_across_chunks() {
    let body = "{\"response\":\"தமிழ் \",\"done\":false}\n\
                {\"response\":\"அறிவிப்பு\",\"done\":true}\n";
    let base_url = serve_in_chunks(split_inside(body, 'அ'));

    let provider = OllamaProvider::new(&ollama_config(&base_url));
    let (tx, _rx) = mpsc::channel(32);
    let result = provider
        .generate(&test_prompt(), tx, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result, "தமிழ் அறிவிப்பு");
}

#[tokio::test]
async fn openai_final_event_without_newline() {
    let server = MockServer::start().await;

    let body = r#"data: {"choices":[{"delta":{"content":"{}"},"finish_reason":null}]}"#;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&openai_config(&server.uri()));
    let (tx, _rx) = mpsc::channel(32);
    let result = provider
        .generate(&test_prompt(), tx, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result, "{}");
}

#[tokio::test]
async fn openai_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"error": {"message": "invalid API key"}})),
        )
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&openai_config(&server.uri()));
    match provider.verify().await.unwrap_err() {
        Error::Provider { provider, message } => {
            assert_eq!(provider, "openai");
            assert!(
                message.contains("invalid API key"),
                "expected 'invalid API key' in message, got: {message}"
            );
        }
        other => panic!("expected Provider error, got: {other:?}"),
    }
}

#[tokio::test]
async fn groq_verify_missing_key() {
    let config = Config {
        provider: Provider::Groq,
        api_key: None,
        ..Config::default()
    };

    let provider = OpenAiProvider::new(&config);
    assert_eq!(provider.name(), "groq");

    match provider.verify().await.unwrap_err() {
        Error::Provider { provider, message } => {
            assert_eq!(provider, "groq");
            assert!(message.contains("API key"), "got: {message}");
        }
        other => panic!("expected Provider error, got: {other:?}"),
    }
}
