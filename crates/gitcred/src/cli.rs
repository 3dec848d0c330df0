//! Clap CLI definitions for the `gitcred` command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// gitcred -- feed short-lived HTTPS tokens into git's credential cache.
///
/// Configures git to authenticate over HTTPS with a token held only in the
/// memory of git's credential-cache daemon, and rewrites SSH remotes of the
/// host to HTTPS.
#[derive(Parser, Debug)]
#[command(
    name = "gitcred",
    about = "Feed short-lived HTTPS tokens into git's credential cache",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Config file (default: ./gitcred.yaml when present).
    #[arg(long, global = true, env = "GITCRED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enable the cache helper, rewrite SSH remotes, and cache a token.
    Write(WriteArgs),

    /// Show the credential git resolves for a host.
    Fill(FillArgs),

    /// Show the credential helper and URL rewrite currently configured.
    Status(TargetArgs),

    /// Stop the credential cache daemon, forgetting all cached tokens.
    Stop,

    /// Generate shell completion scripts.
    Completion(CompletionArgs),

    /// Print version information.
    Version,
}

// ---------------------------------------------------------------------------
// Target
// ---------------------------------------------------------------------------

/// Username/hostname pair, defaulting to the configured values.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Username presented with the token.
    #[arg(short = 'u', long)]
    pub username: Option<String>,

    /// Host the credential applies to.
    #[arg(short = 'H', long)]
    pub hostname: Option<String>,
}

// ---------------------------------------------------------------------------
// Write
// ---------------------------------------------------------------------------

/// Arguments for `gitcred write`.
///
/// The token is never accepted as an argument: it is read from the
/// configured environment variable or, with `--token-stdin`, from stdin.
#[derive(Args, Debug)]
pub struct WriteArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Token expiry, as Unix seconds or RFC 3339 (default: none).
    #[arg(short = 'e', long)]
    pub expiry: Option<String>,

    /// Read the token from the first line of stdin.
    #[arg(long)]
    pub token_stdin: bool,
}

// ---------------------------------------------------------------------------
// Fill
// ---------------------------------------------------------------------------

/// Arguments for `gitcred fill`.
#[derive(Args, Debug)]
pub struct FillArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Print the password instead of masking it.
    #[arg(long)]
    pub reveal: bool,
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Arguments for `gitcred completion`.
#[derive(Args, Debug)]
pub struct CompletionArgs {
    /// Shell to generate the script for.
    #[arg(value_enum)]
    pub shell: Shell,
}
