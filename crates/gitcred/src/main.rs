//! `gitcred` -- feed short-lived HTTPS tokens into git's credential cache.
//!
//! This is the entry point of the CLI. It parses arguments with clap, sets up
//! logging, loads configuration, and dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, GlobalArgs};
use context::RuntimeContext;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logging(&cli.global);

    let result = run(cli.command, &cli.global);

    // Handle errors: print message and exit with code 1
    if let Err(e) = result {
        // For JSON mode, output error as JSON
        if cli.global.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{}", s);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn run(command: Option<Commands>, global: &GlobalArgs) -> Result<()> {
    let command = match command {
        // Completions must work even with a broken config file.
        Some(Commands::Completion(args)) => return commands::completion::run(&args),
        Some(command) => command,
        None => {
            // No subcommand -- print help
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            return Ok(());
        }
    };

    let ctx = RuntimeContext::from_global_args(global)?;
    tracing::debug!(config = ?ctx.config, "loaded configuration");

    match command {
        Commands::Write(args) => commands::write::run(&ctx, &args),
        Commands::Fill(args) => commands::fill::run(&ctx, &args),
        Commands::Status(args) => commands::status::run(&ctx, &args),
        Commands::Stop => commands::stop::run(&ctx),
        Commands::Version => commands::version::run(&ctx),
        Commands::Completion(_) => unreachable!("handled before loading configuration"),
    }
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins; otherwise the level follows `--verbose` / `--quiet`.
fn init_logging(global: &GlobalArgs) {
    let default_level = if global.quiet {
        "warn"
    } else if global.verbose {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}
