//! `gitcred stop` -- stop git's credential cache daemon.

use anyhow::{Context, Result};

use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `gitcred stop` command.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    ctx.git()
        .exit_credential_cache()
        .context("failed to stop the credential cache daemon")?;

    if ctx.json {
        output_json(&serde_json::json!({ "stopped": true }));
    } else if !ctx.quiet {
        println!("Credential cache stopped");
    }
    Ok(())
}
