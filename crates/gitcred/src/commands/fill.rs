//! `gitcred fill` -- show the credential git resolves for a host.

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::cli::FillArgs;
use crate::context::RuntimeContext;
use crate::output::{masked, output_json};

/// Execute the `gitcred fill` command.
pub fn run(ctx: &RuntimeContext, args: &FillArgs) -> Result<()> {
    let (username, hostname) = ctx.resolve_target(&args.target);
    let record = ctx
        .git()
        .fill(&hostname, &username)
        .with_context(|| format!("no credential available for {username}@{hostname}"))?;

    let fields = record.iter().map(|(key, value)| {
        let value = if key == "password" {
            masked(value, args.reveal)
        } else {
            value
        };
        (key, value)
    });

    if ctx.json {
        let map: Map<String, Value> = fields
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        output_json(&map);
    } else {
        for (key, value) in fields {
            println!("{key}={value}");
        }
    }

    Ok(())
}
