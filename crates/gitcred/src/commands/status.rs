//! `gitcred status` -- show the git configuration gitcred manages.

use anyhow::Result;
use gitcred_git::provision::{rewrite_key, ssh_prefix};

use crate::cli::TargetArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `gitcred status` command.
pub fn run(ctx: &RuntimeContext, args: &TargetArgs) -> Result<()> {
    let (username, hostname) = ctx.resolve_target(args);
    let git = ctx.git();

    let helper = git.config_get_global("credential.helper")?;
    let key = rewrite_key(&username, &hostname);
    let rewrite = git.config_get_global(&key)?;
    let rewrite_installed = rewrite.as_deref() == Some(ssh_prefix(&hostname).as_str());

    if ctx.json {
        output_json(&serde_json::json!({
            "credential_helper": helper,
            "rewrite_key": key,
            "rewrite": rewrite,
            "rewrite_installed": rewrite_installed,
        }));
    } else {
        println!(
            "credential.helper: {}",
            helper.as_deref().unwrap_or("(not set)")
        );
        println!("{}: {}", key, rewrite.as_deref().unwrap_or("(not set)"));
    }

    Ok(())
}
