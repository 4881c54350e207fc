// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::domain::Language;

#[derive(Parser, Debug)]
#[command(name = "civic-translator")]
#[command(version)]
#[command(
    about = "Plain-language explanations of government documents",
    long_about = None
)]
#[command(group(ArgGroup::new("input").args(["file", "text", "url"])))]
pub struct Cli {
    /// Document to explain (text, Markdown, PDF). Use `-` to read stdin
    pub file: Option<PathBuf>,

    /// Explain pasted text instead of a file
    #[arg(long)]
    pub text: Option<String>,

    /// Explain the page at this address
    #[arg(long)]
    pub url: Option<String>,

    /// Explanation language
    #[arg(short, long, value_enum, env = "CIVIC_LANGUAGE", global = true)]
    pub language: Option<Language>,

    /// Your age, used to personalize the explanation
    #[arg(long)]
    pub age: Option<String>,

    /// Your state or district
    #[arg(long)]
    pub location: Option<String>,

    /// Your occupation (student, farmer, business, salaried, retired, ...)
    #[arg(long)]
    pub occupation: Option<String>,

    /// Fill in language, age, location and occupation interactively
    #[arg(long)]
    pub ask: bool,

    /// LLM provider (groq, openai, ollama)
    #[arg(short, long, env = "CIVIC_PROVIDER")]
    pub provider: Option<String>,

    /// Model name
    #[arg(short, long, env = "CIVIC_MODEL")]
    pub model: Option<String>,

    /// Only run keyword screening; never contact the language model
    #[arg(long)]
    pub no_llm: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Save a spoken version of the explanation to this file
    #[arg(long, value_name = "PATH")]
    pub speak: Option<PathBuf>,

    /// Copy the explanation to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// Show the prompt sent to the LLM
    #[arg(long)]
    pub show_prompt: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Initialize config file
    Init,
    /// Show current configuration
    Config,
    /// Check configuration and connectivity
    Doctor,
    /// Run identity and scam screening only
    Screen {
        /// Document to screen. Use `-` to read stdin
        file: Option<PathBuf>,

        /// Screen pasted text instead of a file
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
    },
    /// Turn text into speech and save the audio
    Speak {
        /// Text to read aloud
        text: String,

        /// Where to write the audio
        #[arg(short, long, default_value = "explanation.mp3")]
        output: PathBuf,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Store an API key in the system keychain (groq, openai, murf)
    #[cfg(feature = "secure-storage")]
    SetKey {
        service: String,
    },
    /// Check whether an API key is stored in the system keychain
    #[cfg(feature = "secure-storage")]
    GetKey {
        service: String,
    },
}
