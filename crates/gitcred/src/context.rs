//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds all the state a command handler needs: the
//! loaded configuration and the global output flags.

use anyhow::{Context, Result};
use gitcred_config::{GitcredConfig, load_config};
use gitcred_git::Git;

use crate::cli::{GlobalArgs, TargetArgs};

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Layered configuration (defaults, file, environment).
    pub config: GitcredConfig,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments, loading the
    /// configuration.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let config = load_config(global.config.as_deref()).context("failed to load configuration")?;
        Ok(Self::with_config(global, config))
    }

    pub fn with_config(global: &GlobalArgs, config: GitcredConfig) -> Self {
        Self {
            config,
            json: global.json,
            quiet: global.quiet,
        }
    }

    /// A git handle for the configured program.
    pub fn git(&self) -> Git {
        Git::new(&self.config.git_program)
    }

    /// Resolve username and hostname: flags win over configuration.
    pub fn resolve_target(&self, target: &TargetArgs) -> (String, String) {
        let username = target
            .username
            .clone()
            .unwrap_or_else(|| self.config.username.clone());
        let hostname = target
            .hostname
            .clone()
            .unwrap_or_else(|| self.config.hostname.clone());
        (username, hostname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global() -> GlobalArgs {
        GlobalArgs {
            config: None,
            json: false,
            verbose: false,
            quiet: false,
        }
    }

    #[test]
    fn resolve_target_defaults_to_config() {
        let ctx = RuntimeContext::with_config(&global(), GitcredConfig::default());
        let target = TargetArgs {
            username: None,
            hostname: None,
        };
        assert_eq!(
            ctx.resolve_target(&target),
            ("x-access-token".to_string(), "github.com".to_string())
        );
    }

    #[test]
    fn resolve_target_flags_win() {
        let ctx = RuntimeContext::with_config(&global(), GitcredConfig::default());
        let target = TargetArgs {
            username: Some("bot".to_string()),
            hostname: None,
        };
        assert_eq!(
            ctx.resolve_target(&target),
            ("bot".to_string(), "github.com".to_string())
        );
    }

    #[test]
    fn git_uses_configured_program() {
        let config = GitcredConfig {
            git_program: "/opt/git/bin/git".to_string(),
            ..GitcredConfig::default()
        };
        let ctx = RuntimeContext::with_config(&global(), config);
        assert_eq!(ctx.git().program(), "/opt/git/bin/git");
    }
}
