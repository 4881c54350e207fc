// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::signal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cli::{Cli, Commands};
use crate::config::{Config, Provider};
use crate::domain::{
    Analysis, AnalysisSession, DocumentInput, Language, OCCUPATIONS, StatusUpdate, UserContext,
    Verdict,
};
use crate::error::{Error, Result};
use crate::services::{
    extract, llm,
    pipeline::AnalysisPipeline,
    render,
    screening::Screener,
    speech::SpeechService,
};

pub struct App {
    cli: Cli,
    config: Config,
    cancel_token: CancellationToken,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        let config = Config::load(&cli)?;
        debug!(
            provider = %config.provider,
            model = %config.model,
            language = %config.language,
            llm_enabled = config.llm.enabled,
            "config loaded"
        );
        let cancel_token = CancellationToken::new();
        Ok(Self {
            cli,
            config,
            cancel_token,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let cancel = self.cancel_token.clone();
        tokio::spawn(async move {
            signal::ctrl_c().await.ok();
            cancel.cancel();
        });

        if let Some(ref cmd) = self.cli.command {
            return self.handle_command(cmd).await;
        }

        self.explain().await
    }

    async fn explain(&self) -> Result<()> {
        let input = self.document_input().await?;
        let context = self.user_context()?;

        self.config.ensure_llm_ready()?;
        let pipeline = AnalysisPipeline::new(&self.config);

        if self.cli.show_prompt && pipeline.provider_name().is_some() {
            let document = pipeline.read_input(&input).await?;
            let prompt = pipeline.build_prompt(&document.text, &context);
            eprintln!("{}", style("--- PROMPT ---").dim());
            eprintln!("{}", prompt.display());
            eprintln!("{}", style("--- END PROMPT ---").dim());
        }

        if self.cancel_token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        match pipeline.provider_name() {
            Some(name) => self.print_status(&format!(
                "Explaining {} in {} with {} ({})",
                input.describe(),
                context.language.english_name(),
                name,
                self.config.model
            )),
            None => self.print_status(&format!("Screening {}", input.describe())),
        }

        let analysis = self.run_with_progress(&pipeline, &input, &context).await?;

        if self.cli.json {
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        } else {
            println!();
            print!("{}", render::render(&analysis.result, analysis.verdict));
        }

        if analysis.verdict == Verdict::Explained {
            if let Some(ref path) = self.cli.speak {
                self.speak_result(&analysis, context.language, path).await;
            }
            if self.cli.copy {
                self.copy_result(&analysis)?;
            }
        }

        if analysis.verdict == Verdict::Failed {
            return Err(Error::AnalysisFailed);
        }
        Ok(())
    }

    async fn run_with_progress(
        &self,
        pipeline: &AnalysisPipeline,
        input: &DocumentInput,
        context: &UserContext,
    ) -> Result<Analysis> {
        let interactive = std::io::stderr().is_terminal() && !self.cli.json;
        let bar = if interactive {
            let bar = ProgressBar::new(100);
            if let Ok(bar_style) = ProgressStyle::with_template("{bar:30.cyan/blue} {pos:>3}% {msg}")
            {
                bar.set_style(bar_style.progress_chars("█▓░"));
            }
            bar
        } else {
            ProgressBar::hidden()
        };

        let (status_tx, mut status_rx) = mpsc::unbounded_channel::<StatusUpdate>();
        let progress = bar.clone();
        let status_handle = tokio::spawn(async move {
            while let Some(update) = status_rx.recv().await {
                debug!(status = %update.status, progress = update.progress, "status changed");
                progress.set_position(u64::from(update.progress));
                progress.set_message(render::status_label(update.status));
            }
        });

        // Tokens arrive as the model streams; only the byte count is shown
        let (token_tx, mut token_rx) = mpsc::channel::<String>(64);
        let cancel_for_tokens = self.cancel_token.clone();
        let streaming = bar.clone();
        let token_handle = tokio::spawn(async move {
            let mut received = 0usize;
            loop {
                tokio::select! {
                    _ = cancel_for_tokens.cancelled() => break,
                    token = token_rx.recv() => {
                        let Some(token) = token else { break };
                        received += token.len();
                        streaming.set_message(format!("Simplifying complex terms ({received} bytes)"));
                    }
                }
            }
        });

        let mut session = AnalysisSession::observed(status_tx);
        let outcome = pipeline
            .run(
                input,
                context,
                &mut session,
                token_tx,
                self.cancel_token.clone(),
            )
            .await;

        // Dropping the session closes the status channel
        drop(session);
        let _ = status_handle.await;
        let _ = token_handle.await;
        bar.finish_and_clear();

        outcome
    }

    async fn document_input(&self) -> Result<DocumentInput> {
        if let Some(ref text) = self.cli.text {
            return Ok(DocumentInput::Text(text.clone()));
        }
        if let Some(ref url) = self.cli.url {
            return Ok(DocumentInput::Url(url.clone()));
        }
        match self.cli.file {
            Some(ref path) => file_input(path, self.config.max_file_bytes).await,
            None => Err(Error::NoInput),
        }
    }

    fn user_context(&self) -> Result<UserContext> {
        let language = self.config.language;
        let context = UserContext::new(language)
            .with_age(self.cli.age.clone())
            .with_location(self.cli.location.clone())
            .with_occupation(self.cli.occupation.clone());

        let interactive = std::io::stdin().is_terminal() && std::io::stderr().is_terminal();
        if !self.cli.ask {
            return Ok(context);
        }
        if !interactive {
            self.print_warning("--ask needs a terminal, using the flags given");
            return Ok(context);
        }

        Self::ask_context(context)
    }

    fn ask_context(context: UserContext) -> Result<UserContext> {
        let labels: Vec<String> = Language::ALL.iter().map(Language::label).collect();
        let current = Language::ALL
            .iter()
            .position(|l| *l == context.language)
            .unwrap_or(0);
        let choice = dialoguer::Select::new()
            .with_prompt("Language")
            .items(&labels)
            .default(current)
            .interact()?;
        let language = Language::ALL[choice];

        let age: String = dialoguer::Input::new()
            .with_prompt("Age (optional)")
            .with_initial_text(context.age.clone().unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;

        let location: String = dialoguer::Input::new()
            .with_prompt("State or district (optional)")
            .with_initial_text(context.location.clone().unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;

        let mut occupations: Vec<&str> = OCCUPATIONS.iter().map(|(_, label)| *label).collect();
        occupations.push("Prefer not to say");
        let picked = dialoguer::Select::new()
            .with_prompt("Occupation")
            .items(&occupations)
            .default(occupations.len() - 1)
            .interact()?;
        let occupation = OCCUPATIONS
            .get(picked)
            .map(|(key, _)| (*key).to_string())
            .or(context.occupation);

        Ok(UserContext::new(language)
            .with_age(Some(age))
            .with_location(Some(location))
            .with_occupation(occupation))
    }

    async fn speak_result(&self, analysis: &Analysis, language: Language, path: &Path) {
        let script = analysis.result.speech_script();
        let speech = SpeechService::new(&self.config.speech);

        if !speech.is_configured() {
            self.print_warning("Speech is not configured (set MURF_API_KEY). Script to read aloud:");
            eprintln!("{script}");
            return;
        }

        self.print_status(&format!(
            "Generating audio ({})",
            speech.voice_for(language)
        ));
        match speech.synthesize(&script, language).await {
            Ok(audio) => match tokio::fs::write(path, &audio).await {
                Ok(()) => eprintln!(
                    "{} Audio saved to {}",
                    style("✓").green().bold(),
                    path.display()
                ),
                Err(e) => self.print_warning(&format!("Could not save audio: {e}")),
            },
            Err(e) => {
                warn!(error = %e, "speech generation failed");
                self.print_warning(&format!("{e}. Script to read aloud:"));
                eprintln!("{script}");
            }
        }
    }

    fn copy_result(&self, analysis: &Analysis) -> Result<()> {
        let text = console::strip_ansi_codes(&render::render_explanation(&analysis.result))
            .into_owned();
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| Error::Clipboard(e.to_string()))?;
        self.print_info("Explanation copied to clipboard");
        Ok(())
    }

    async fn handle_command(&self, cmd: &Commands) -> Result<()> {
        match cmd {
            Commands::Init => {
                let path = Config::create_default()?;
                println!("Created config: {}", path.display());
                Ok(())
            }
            Commands::Config => {
                println!("Provider: {}", self.config.provider);
                println!("Model: {}", self.config.model);
                if self.config.provider != Provider::Ollama {
                    println!("Endpoint: {}", self.config.openai_base_url());
                }
                println!("Ollama host: {}", self.config.ollama_host);
                println!("Language: {}", self.config.language.label());
                println!("Timeout: {}s", self.config.timeout_secs);
                println!("Request timeout: {}s", self.config.request_timeout_secs);
                println!("Temperature: {}", self.config.temperature);
                println!("Max tokens: {}", self.config.max_tokens);
                println!("Max file bytes: {}", self.config.max_file_bytes);
                println!("Max document chars: {}", self.config.max_document_chars);
                println!();
                println!("[llm]");
                println!("  enabled: {}", self.config.llm.enabled);
                println!("[web]");
                println!("  timeout_secs: {}", self.config.web.timeout_secs);
                println!("  max_chars: {}", self.config.web.max_chars);
                println!("[screening]");
                println!("  scam_threshold: {}", self.config.screening.scam_threshold);
                println!(
                    "  extra keywords: {} identity, {} scam",
                    self.config.screening.extra_identity_keywords.len(),
                    self.config.screening.extra_scam_keywords.len()
                );
                println!("[speech]");
                println!(
                    "  api_key: {}",
                    if self.config.speech.api_key.is_some() {
                        "configured"
                    } else {
                        "not set"
                    }
                );
                println!("  format: {}", self.config.speech.format);
                Ok(())
            }
            Commands::Doctor => self.run_doctor().await,
            Commands::Screen { file, text } => self.run_screen(file.as_deref(), text.as_deref()).await,
            Commands::Speak { text, output } => self.run_speak(text, output).await,
            Commands::Completions { shell } => {
                let mut cmd = <Cli as clap::CommandFactory>::command();
                clap_complete::generate(
                    *shell,
                    &mut cmd,
                    "civic-translator",
                    &mut std::io::stdout(),
                );
                Ok(())
            }
            #[cfg(feature = "secure-storage")]
            Commands::SetKey { service } => self.set_api_key(service),
            #[cfg(feature = "secure-storage")]
            Commands::GetKey { service } => self.get_api_key(service),
        }
    }

    async fn run_screen(&self, file: Option<&Path>, text: Option<&str>) -> Result<()> {
        let input = match (file, text) {
            (_, Some(text)) => DocumentInput::Text(text.to_string()),
            (Some(path), None) => file_input(path, self.config.max_file_bytes).await?,
            (None, None) => return Err(Error::NoInput),
        };

        let pipeline = AnalysisPipeline::with_provider(&self.config, None);
        let document = pipeline.read_input(&input).await?;
        let report = Screener::new(&self.config.screening).scan(&document.text);

        if self.cli.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{}", render::render_screening(&report));
        }
        Ok(())
    }

    async fn run_speak(&self, text: &str, output: &Path) -> Result<()> {
        let speech = SpeechService::new(&self.config.speech);
        let language = self.config.language;

        self.print_status(&format!(
            "Generating audio ({})",
            speech.voice_for(language)
        ));
        let audio = speech.synthesize(text, language).await?;
        tokio::fs::write(output, &audio).await?;

        eprintln!(
            "{} Audio saved to {} ({} bytes)",
            style("✓").green().bold(),
            output.display(),
            audio.len()
        );
        Ok(())
    }

    async fn run_doctor(&self) -> Result<()> {
        eprintln!("{} Running diagnostics...\n", style("→").cyan());

        eprintln!("{}", style("Configuration").bold().underlined());
        eprintln!("  Provider:    {}", self.config.provider);
        eprintln!("  Model:       {}", self.config.model);
        eprintln!("  Language:    {}", self.config.language.label());
        eprintln!("  Timeout:     {}s", self.config.timeout_secs);
        if let Some(ref path) = Config::config_path() {
            let status = if path.exists() { "found" } else { "not found" };
            eprintln!("  Config file: {} ({})", path.display(), status);
        }
        eprintln!();

        eprintln!("{}", style("Language Model").bold().underlined());
        if !self.config.llm.enabled {
            eprintln!("  {}", style("disabled (screening only)").yellow());
        } else {
            let provider = llm::create_provider(&self.config);
            match self.config.provider {
                Provider::Ollama => eprint!("  Ollama ({}): ", self.config.ollama_host),
                other => eprint!("  {} ({}): ", other, self.config.openai_base_url()),
            }
            match provider.verify().await {
                Ok(()) => {
                    eprintln!("{}", style("OK").green().bold());
                }
                Err(Error::OllamaNotRunning { .. }) => {
                    eprintln!("{}", style("NOT RUNNING").red().bold());
                    eprintln!("  Start with: {}", style("ollama serve").yellow());
                }
                Err(Error::ModelNotFound { ref available, .. }) => {
                    eprintln!("{}", style("connected").green());
                    eprintln!(
                        "  Model '{}': {}",
                        self.config.model,
                        style("NOT FOUND").red().bold()
                    );
                    eprintln!(
                        "  Pull with: {}",
                        style(format!("ollama pull {}", self.config.model)).yellow()
                    );
                    if !available.is_empty() {
                        eprintln!("  Available: {}", available.join(", "));
                    }
                }
                Err(e) => {
                    eprintln!("{}: {}", style("ERROR").red().bold(), e);
                }
            }
        }
        eprintln!();

        eprintln!("{}", style("Speech").bold().underlined());
        let speech = SpeechService::new(&self.config.speech);
        eprint!("  Murf API key: ");
        if speech.is_configured() {
            eprintln!("{}", style("configured").green());
        } else {
            eprintln!("{}", style("MISSING").yellow().bold());
            eprintln!("  Spoken output falls back to printing the script");
        }
        eprintln!(
            "  Voice:        {}",
            speech.voice_for(self.config.language)
        );

        eprintln!();
        eprintln!("{} Diagnostics complete.", style("✓").green().bold());

        Ok(())
    }

    // ─── Keyring Commands ───

    #[cfg(feature = "secure-storage")]
    fn keyring_service(service: &str) -> Result<String> {
        let service = service.to_lowercase();
        if !matches!(service.as_str(), "groq" | "openai" | "murf") {
            return Err(Error::Config(format!(
                "Keyring storage is only for groq, openai and murf, got '{service}'"
            )));
        }
        Ok(service)
    }

    #[cfg(feature = "secure-storage")]
    fn set_api_key(&self, service: &str) -> Result<()> {
        let service = Self::keyring_service(service)?;

        eprintln!(
            "Enter API key for {} (input will be hidden):",
            style(&service).bold()
        );

        let key = dialoguer::Password::new()
            .with_prompt("API key")
            .interact()
            .map_err(|e| Error::Dialog(e.to_string()))?;

        if key.trim().is_empty() {
            return Err(Error::Config("API key cannot be empty".into()));
        }

        let entry = keyring::Entry::new("civic-translator", &service)
            .map_err(|e| Error::Keyring(e.to_string()))?;
        entry
            .set_password(key.trim())
            .map_err(|e| Error::Keyring(e.to_string()))?;

        eprintln!("{} API key stored for {}", style("✓").green().bold(), service);
        Ok(())
    }

    #[cfg(feature = "secure-storage")]
    fn get_api_key(&self, service: &str) -> Result<()> {
        let service = Self::keyring_service(service)?;

        let entry = keyring::Entry::new("civic-translator", &service)
            .map_err(|e| Error::Keyring(e.to_string()))?;

        match entry.get_password() {
            Ok(_) => {
                eprintln!(
                    "{} API key for {} is stored in keychain",
                    style("✓").green().bold(),
                    service
                );
            }
            Err(keyring::Error::NoEntry) => {
                eprintln!(
                    "{} No API key found for {} in keychain",
                    style("✗").red().bold(),
                    service
                );
                eprintln!(
                    "  Store one with: {}",
                    style(format!("civic-translator set-key {service}")).yellow()
                );
            }
            Err(e) => {
                return Err(Error::Keyring(e.to_string()));
            }
        }

        Ok(())
    }

    // ─── Output Helpers ───

    fn print_status(&self, msg: &str) {
        eprintln!("{} {}", style("→").cyan(), msg);
    }

    fn print_info(&self, msg: &str) {
        eprintln!("{} {}", style("info:").cyan(), msg);
    }

    fn print_warning(&self, msg: &str) {
        eprintln!("{} {}", style("warning:").yellow().bold(), msg);
    }
}

/// `-` reads the document from stdin; anything else is a path or a link.
async fn file_input(path: &Path, max_bytes: u64) -> Result<DocumentInput> {
    if path == Path::new("-") {
        let data = extract::read_limited(tokio::io::stdin(), max_bytes).await?;
        return Ok(DocumentInput::Bytes {
            name: "stdin".into(),
            data,
        });
    }

    let raw = path.to_string_lossy();
    if !path.exists() && extract::looks_like_url(&raw) {
        return Ok(DocumentInput::Url(raw.into_owned()));
    }
    Ok(DocumentInput::File(PathBuf::from(path)))
}
