//! Command-line argument parsing for Quill.

use clap::Parser;
use std::path::PathBuf;

/// A scriptable, AI-first command console.
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Script file to run instead of the interactive console
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    /// Line to execute before exiting (repeatable)
    #[arg(short = 'e', long = "execute", value_name = "LINE")]
    pub execute: Vec<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// LLM provider override (openai, ollama, mock)
    #[arg(long, value_name = "PROVIDER")]
    pub llm: Option<String>,

    /// Use the deterministic mock LLM backend (no API key needed)
    #[arg(long)]
    pub mock_llm: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    /// Returns the provider override, if any. `--mock-llm` wins over `--llm`.
    pub fn provider_override(&self) -> Option<&str> {
        if self.mock_llm {
            Some("mock")
        } else {
            self.llm.as_deref()
        }
    }

    /// Returns true when no script or `-e` lines were given.
    pub fn is_interactive(&self) -> bool {
        self.script.is_none() && self.execute.is_empty()
    }
}
