//! expert-chat - Expert persona consultation chat
//!
//! Entry point for the expert-chat binary. Serves the consultation web form
//! or answers a single question from the terminal.

mod cli;
mod completion;
mod config;
mod consult;
mod error;
mod logging;
mod persona;
mod version;
mod web;

use std::io::Read;

use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Commands, ConfigSubcommand, PersonaSubcommand};
use crate::config::ChatConfig;
use crate::consult::{is_blank, Dispatcher, EMPTY_INPUT_WARNING};
use crate::error::{Error, Result};
use crate::logging::LogGuards;
use crate::persona::PersonaRegistry;
use crate::web::WebState;

fn main() {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    // .env must be in the environment before config reads OPENAI_API_KEY
    config::load_env_file(cli.env_file.as_deref())?;

    // Commands that don't touch the completion service use simple setup
    match cli.command {
        Commands::Version => {
            version::print_version();
            Ok(())
        }
        Commands::Persona { subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            handle_persona_command(subcommand)
        }
        Commands::Config { subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            handle_config_command(subcommand)
        }
        Commands::Serve { config, host, port } => {
            let mut cfg = ChatConfig::load(config.as_deref())?;
            if let Some(host) = host {
                cfg.server.host = host;
            }
            if let Some(port) = port {
                cfg.server.port = port;
            }

            let _log_guards = init_logging_from_config(&cfg, cli.verbose, cli.quiet)?;
            log_startup();
            run_server(cfg)
        }
        Commands::Ask {
            text,
            persona,
            config,
        } => {
            let cfg = ChatConfig::load(config.as_deref())?;
            let _log_guards = init_logging_from_config(&cfg, cli.verbose, cli.quiet)?;
            run_ask(cfg, text, &persona)
        }
    }
}

/// Initialize logging from configuration
fn init_logging_from_config(config: &ChatConfig, verbose: u8, quiet: bool) -> Result<LogGuards> {
    logging::init_logging(&config.logging, verbose, quiet)
}

fn log_startup() {
    let build = version::build_info();
    info!(
        version = %build.full_version(),
        target = %build.target,
        profile = %build.profile,
        "Starting expert-chat"
    );
}

/// Serve the web UI until Ctrl+C
fn run_server(config: ChatConfig) -> Result<()> {
    info!(
        provider = ?config.completion.provider,
        base_url = %config.completion.base_url,
        model = %config.completion.model,
        "Configuration loaded"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("expert-chat")
        .build()
        .map_err(|e| Error::Internal(format!("Failed to create async runtime: {}", e)))?;

    runtime.block_on(async {
        let service = completion::create_service(&config.completion)?;
        let state = WebState::new(Dispatcher::new(service));
        web::serve(&config.bind_address(), state).await
    })
}

/// Answer one question and print the result on stdout
fn run_ask(config: ChatConfig, text: Option<String>, persona_id: &str) -> Result<()> {
    // Fail on a bad persona before blocking on stdin
    PersonaRegistry::new().lookup(persona_id)?;

    let question = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| Error::IoRead {
                    path: "<stdin>".into(),
                    source: e,
                })?;
            buf
        }
    };

    if is_blank(&question) {
        eprintln!("{}", EMPTY_INPUT_WARNING);
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Internal(format!("Failed to create runtime: {}", e)))?;

    let answer = runtime.block_on(async {
        let service = completion::create_service(&config.completion)?;
        Dispatcher::new(service).respond(&question, persona_id).await
    })?;

    println!("{}", answer);
    Ok(())
}

/// Handle persona subcommands
fn handle_persona_command(subcommand: PersonaSubcommand) -> Result<()> {
    let registry = PersonaRegistry::new();

    match subcommand {
        PersonaSubcommand::List => {
            for persona in registry.all() {
                println!("{:<10} {}", persona.id.slug(), persona.display_label);
            }
        }
        PersonaSubcommand::Show { persona } => {
            let def = registry.lookup(&persona)?;
            println!("ID:          {}", def.id.slug());
            println!("Label:       {}", def.display_label);
            println!("Instruction: {}", def.instruction);
        }
    }

    Ok(())
}

/// Handle configuration subcommands
fn handle_config_command(subcommand: ConfigSubcommand) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show { config } => {
            let cfg = ChatConfig::load(config.as_deref())?;
            println!("{}", toml::to_string_pretty(&cfg.redacted())?);
        }
        ConfigSubcommand::Init { path, force } => {
            let written = config::init_config(path.as_deref(), force)?;
            println!("Configuration written to {}", written.display());
        }
        ConfigSubcommand::Validate { config } => {
            ChatConfig::load(config.as_deref())?;
            println!("Configuration is valid.");
        }
    }

    Ok(())
}
