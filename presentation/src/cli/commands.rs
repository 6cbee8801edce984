//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for transcripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human readable messages
    Text,
    /// One JSON object per message
    Json,
}

impl From<OutputFormat> for parley_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => parley_domain::OutputFormat::Text,
            OutputFormat::Json => parley_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for parley
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(author, version, about = "Talk to one model, compare two, or let two discuss")]
#[command(long_about = r#"
Parley sends your prompts to hosted language models and keeps the
conversation as a thread of messages.

  send      One prompt, one model
  compare   One prompt, two models side by side
  discuss   Two models answer each other for a bounded number of rounds
  chat      Interactive session with all of the above

Configuration files are loaded from (in priority order):
1. PARLEY_* environment variables
2. --config <path>     Explicit config file
3. ./parley.toml       Project-level config
4. ~/.config/parley/config.toml   Global config

Example:
  parley send -m claude-3-haiku-20240307 "Explain lifetimes in one paragraph"
  parley compare gpt-4 claude-3-opus-20240229 "Is P = NP?"
  parley discuss gpt-4 grok-beta "Tabs or spaces?"
  parley chat -m gpt-4
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (overrides [output] format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send one prompt to one model
    Send {
        /// Model id (defaults to [models] default)
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,
        /// The prompt
        message: String,
    },
    /// Ask two models the same question concurrently
    Compare {
        model1: String,
        model2: String,
        message: String,
    },
    /// Let two models discuss, starting from your prompt
    Discuss {
        model1: String,
        model2: String,
        message: String,
        /// Number of rounds (overrides [orchestrator] max_rounds)
        #[arg(short, long)]
        rounds: Option<u32>,
        /// Delay between turns in milliseconds (overrides [orchestrator] turn_delay_ms)
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,
    },
    /// Start an interactive chat session
    Chat {
        /// Initial model (defaults to [models] default)
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,
    },
    /// List available models
    Models,
}
