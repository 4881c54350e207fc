// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use civic_translator::config::{Config, Provider};
use civic_translator::error::{Error, Result};
use civic_translator::services::llm::LlmProvider;
use civic_translator::services::prompt::Prompt;

/// Config pointing the OpenAI-compatible provider at a mock server
#[allow(dead_code)]
pub fn openai_config(server_url: &str) -> Config {
    Config {
        provider: Provider::OpenAI,
        model: "gpt-4o-mini".into(),
        base_url: Some(server_url.to_string()),
        api_key: Some("test-key".into()),
        timeout_secs: 5,
        request_timeout_secs: 10,
        ..Config::default()
    }
}

/// Config for a local Ollama mock server
#[allow(dead_code)]
pub fn ollama_config(server_url: &str) -> Config {
    Config {
        provider: Provider::Ollama,
        model: "llama3".into(),
        ollama_host: server_url.to_string(),
        timeout_secs: 5,
        request_timeout_secs: 10,
        ..Config::default()
    }
}

/// A well-formed model reply for a scheme notice
#[allow(dead_code)]
pub fn scheme_reply() -> String {
    serde_json::json!({
        "type": "scheme",
        "title": "Pradhan Mantri Fasal Bima Yojana",
        "summary": "Crop insurance for farmers against natural losses.",
        "targetAudience": "Farmers growing notified crops",
        "personalImpact": "You can insure your crop for a small premium.",
        "actionItems": ["Visit your bank branch", "Carry your land records"],
        "benefits": ["Cover for drought and flood losses"],
        "deadlines": ["Enrol before 31 July"],
        "trustNote": "Official scheme notice from the agriculture department",
        "voice_script": "Crop insurance scheme. Enrol before 31 July."
    })
    .to_string()
}

/// Plain scheme text with no identity or scam markers
#[allow(dead_code)]
pub const SCHEME_NOTICE: &str = "Pradhan Mantri Fasal Bima Yojana\n\
Farmers growing notified crops may enrol through their bank branch.\n\
Last date for enrolment is 31 July.";

/// Provider returning a canned reply and counting calls
#[allow(dead_code)]
pub struct ScriptedProvider {
    reply: std::result::Result<String, String>,
    calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn replying(reply: impl Into<String>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = Self {
            reply: Ok(reply.into()),
            calls: Arc::clone(&calls),
        };
        (provider, calls)
    }

    pub fn failing(message: impl Into<String>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = Self {
            reply: Err(message.into()),
            calls: Arc::clone(&calls),
        };
        (provider, calls)
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn generate(
        &self,
        _prompt: &Prompt,
        token_tx: mpsc::Sender<String>,
        _cancel: CancellationToken,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Ok(ref reply) => {
                let _ = token_tx.try_send(reply.clone());
                Ok(reply.clone())
            }
            Err(ref message) => Err(Error::Provider {
                provider: "scripted".into(),
                message: message.clone(),
            }),
        }
    }

    async fn verify(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Drain the token receiver and return all collected tokens.
#[allow(dead_code)]
pub async fn drain_tokens(mut rx: mpsc::Receiver<String>) -> Vec<String> {
    let mut tokens = Vec::new();
    while let Some(tok) = rx.recv().await {
        tokens.push(tok);
    }
    tokens
}

/// Serve one HTTP response whose body arrives as separate chunked-encoding
/// chunks, with a pause between them so the client reads them apart.
#[allow(dead_code)]
pub fn serve_in_chunks(chunks: Vec<Vec<u8>>) -> String {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::time::Duration;

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();

        // Read the request head and body before answering
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if let Some(head_end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&request[..head_end]).to_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= head_end + 4 + body_len {
                    break;
                }
            }
        }

        stream
            .write_all(
                b"HTTP/1.1 200 OK\r\n\
                  Content-Type: text/event-stream\r\n\
                  Transfer-Encoding: chunked\r\n\
                  Connection: close\r\n\r\n",
            )
            .unwrap();
        // The client may hang up once it has what it needs
        for chunk in chunks {
            let _ = stream.write_all(format!("{:x}\r\n", chunk.len()).as_bytes());
            let _ = stream.write_all(&chunk);
            let _ = stream.write_all(b"\r\n");
            let _ = stream.flush();
            std::thread::sleep(Duration::from_millis(100));
        }
        let _ = stream.write_all(b"0\r\n\r\n");
        let _ = stream.flush();
    });

    format!("http://{addr}")
}

/// Split `text` inside the first occurrence of `ch`, one byte into it.
#[allow(dead_code)]
pub fn split_inside(text: &str, ch: char) -> Vec<Vec<u8>> {
    let at = text.find(ch).unwrap() + 1;
    let bytes = text.as_bytes();
    vec![bytes[..at].to_vec(), bytes[at..].to_vec()]
}
