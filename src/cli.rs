//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for expert-chat.

use clap::{Parser, Subcommand};

/// expert-chat - Ask a doctor, lawyer or engineer persona a question
///
/// Serves a small consultation web form, or answers a single question from
/// the terminal, by forwarding it to an OpenAI-compatible chat completion
/// endpoint under the chosen persona's instruction.
#[derive(Parser, Debug)]
#[command(name = "expert-chat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Load environment variables from this .env file
    #[arg(long, env = "EXPERT_CHAT_ENV_FILE", global = true)]
    pub env_file: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the consultation web form
    Serve {
        /// Path to configuration file
        #[arg(short, long, env = "EXPERT_CHAT_CONFIG")]
        config: Option<String>,

        /// Interface to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask a single question and print the answer
    Ask {
        /// Question text (read from stdin when omitted)
        text: Option<String>,

        /// Persona to consult: doctor, lawyer, engineer
        #[arg(short = 'P', long, env = "EXPERT_CHAT_PERSONA", default_value = "doctor")]
        persona: String,

        /// Path to configuration file
        #[arg(short, long, env = "EXPERT_CHAT_CONFIG")]
        config: Option<String>,
    },

    /// Inspect the built-in personas
    Persona {
        #[command(subcommand)]
        subcommand: PersonaSubcommand,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Display version and build information
    Version,
}

/// Persona subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PersonaSubcommand {
    /// List persona identifiers and labels
    List,

    /// Show a persona's label and instruction
    Show {
        /// Persona identifier: doctor, lawyer, engineer
        persona: String,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the effective configuration (API key masked)
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}
