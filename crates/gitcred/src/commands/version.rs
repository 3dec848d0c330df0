//! `gitcred version` -- print version, build info, git version, and platform.

use anyhow::Result;

use crate::context::RuntimeContext;
use crate::output::output_json;

/// Version string. Set at compile time via Cargo.toml (workspace version).
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build identifier. Can be overridden via environment variable at build time.
const BUILD: &str = {
    match option_env!("GITCRED_BUILD") {
        Some(b) => b,
        None => "dev",
    }
};

/// Execute the `gitcred version` command.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;
    // A missing git is reported, not fatal.
    let git = ctx.git().version().ok();

    if ctx.json {
        let info = serde_json::json!({
            "version": VERSION,
            "build": BUILD,
            "git": git,
            "os": os,
            "arch": arch,
        });
        output_json(&info);
    } else {
        println!("gitcred version {} ({}) {}/{}", VERSION, BUILD, os, arch);
        println!("{}", git.as_deref().unwrap_or("git not found"));
    }

    Ok(())
}
