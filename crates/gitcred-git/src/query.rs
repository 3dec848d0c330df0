//! Read-back and lifecycle operations against git's global state.
//!
//! Nothing here is cached: every call asks git afresh, since the global
//! configuration and the cache daemon can be changed by anyone.

use crate::commands::{Git, GitError, Result};
use crate::credential::{CredentialRecord, fill_input};

impl Git {
    /// Read `key` from the global git configuration.
    ///
    /// Returns `None` when the key is not set (git exits with status 1).
    pub fn config_get_global(&self, key: &str) -> Result<Option<String>> {
        match self.run(&["config", "--global", key]) {
            Ok(output) => Ok(Some(output.stdout_trimmed())),
            Err(GitError::CommandFailed { code: Some(1), .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Ask git's credential helpers for the credential of
    /// `https://<hostname>` and `username`.
    ///
    /// Terminal and askpass prompts are disabled, so a miss fails instead of
    /// blocking on user input.
    pub fn fill(&self, hostname: &str, username: &str) -> Result<CredentialRecord> {
        let input = fill_input(hostname, username);
        let output = self
            .clone()
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GIT_ASKPASS", "")
            .run_with_input(&["credential", "fill"], input.as_bytes())?;
        Ok(CredentialRecord::parse(&output.stdout_str()))
    }

    /// Stop the credential cache daemon, dropping everything it holds.
    pub fn exit_credential_cache(&self) -> Result<()> {
        self.run(&["credential-cache", "exit"])?;
        Ok(())
    }

    /// The output of `git --version`.
    pub fn version(&self) -> Result<String> {
        Ok(self.run(&["--version"])?.stdout_trimmed())
    }
}
