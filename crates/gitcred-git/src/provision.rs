//! Provisioning a token into git's credential cache.
//!
//! [`Git::provision`] runs three git invocations in order, stopping at the
//! first failure:
//!
//! 1. `git config --global credential.helper cache --timeout=86400`
//! 2. `git config --global url.https://<user>@<host>.insteadOf ssh://git@<host>`
//! 3. `git credential approve`, with the credential on stdin
//!
//! Every step is safe to repeat. Re-provisioning a host overwrites the cached
//! credential; rewrite rules for different usernames on the same host
//! accumulate, one configuration key per pair.

use std::fmt;

use thiserror::Error;
use tracing::info;

use crate::commands::{Git, GitError, Result};
use crate::credential::CredentialRequest;

/// Lifetime of cached credentials, in seconds.
pub const CACHE_TIMEOUT_SECS: u32 = 86_400;

/// The step of [`Git::provision`] that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStage {
    /// Enabling the credential cache helper.
    CacheHelper,
    /// Installing the SSH-to-HTTPS URL rewrite.
    UrlRewrite,
    /// Feeding the credential to `git credential approve`.
    Approve,
}

impl fmt::Display for ProvisionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            ProvisionStage::CacheHelper => "enabling credential cache helper",
            ProvisionStage::UrlRewrite => "installing url rewrite",
            ProvisionStage::Approve => "approving credential",
        };
        f.write_str(stage)
    }
}

/// A provisioning failure, tagged with the stage it happened in.
#[derive(Debug, Error)]
#[error("{stage} failed: {source}")]
pub struct ProvisionError {
    /// Which step failed. Later steps did not run.
    pub stage: ProvisionStage,
    /// The underlying git failure.
    pub source: GitError,
}

/// The `url.<base>.insteadOf` key installed for a username/hostname pair.
pub fn rewrite_key(username: &str, hostname: &str) -> String {
    format!("url.https://{username}@{hostname}.insteadOf")
}

/// The SSH prefix rewritten to HTTPS for `hostname`.
pub fn ssh_prefix(hostname: &str) -> String {
    format!("ssh://git@{hostname}")
}

impl Git {
    /// Register the caching credential helper globally.
    pub fn enable_cache_helper(&self) -> Result<()> {
        let timeout = format!("--timeout={CACHE_TIMEOUT_SECS}");
        let output = self.run(&[
            "config",
            "--global",
            "credential.helper",
            "cache",
            &timeout,
        ])?;
        info!("successfully ran {}", output.command);
        Ok(())
    }

    /// Rewrite `ssh://git@<hostname>` remotes to `https://<username>@<hostname>`.
    ///
    /// Both values are passed as plain arguments without validation.
    pub fn install_url_rewrite(&self, username: &str, hostname: &str) -> Result<()> {
        let key = rewrite_key(username, hostname);
        let prefix = ssh_prefix(hostname);
        let output = self.run(&["config", "--global", &key, &prefix])?;
        info!("successfully ran {}", output.command);
        Ok(())
    }

    /// Store `request` in the credential cache via `git credential approve`.
    pub fn approve(&self, request: &CredentialRequest) -> Result<()> {
        let input = request.approve_input();
        let output = self.run_with_input(&["credential", "approve"], input.as_bytes())?;
        info!("successfully ran {}", output.command);
        Ok(())
    }

    /// Enable the cache helper, install the URL rewrite, then approve the
    /// credential.
    ///
    /// On success, `git credential fill` for `https://<hostname>` and the
    /// request's username resolves to the supplied secret.
    ///
    /// # Errors
    ///
    /// Returns the first failing step as a [`ProvisionError`]; no later step
    /// runs.
    pub fn provision(&self, request: &CredentialRequest) -> std::result::Result<(), ProvisionError> {
        self.enable_cache_helper()
            .map_err(|source| ProvisionError {
                stage: ProvisionStage::CacheHelper,
                source,
            })?;
        self.install_url_rewrite(&request.username, &request.hostname)
            .map_err(|source| ProvisionError {
                stage: ProvisionStage::UrlRewrite,
                source,
            })?;
        self.approve(request).map_err(|source| ProvisionError {
            stage: ProvisionStage::Approve,
            source,
        })
    }
}

/// [`Git::provision`] with the `git` found on `PATH` and the inherited
/// environment.
///
/// # Examples
///
/// ```no_run
/// use chrono::{Duration, Utc};
/// use gitcred_git::{CredentialRequest, provision};
///
/// let request = CredentialRequest::new("x-access-token", "ghs_example", "github.com")
///     .with_expiry(Utc::now() + Duration::hours(1));
/// provision(&request).unwrap();
/// ```
pub fn provision(request: &CredentialRequest) -> std::result::Result<(), ProvisionError> {
    Git::default().provision(request)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_key_and_prefix() {
        assert_eq!(
            rewrite_key("user", "hostname"),
            "url.https://user@hostname.insteadOf"
        );
        assert_eq!(ssh_prefix("hostname"), "ssh://git@hostname");
    }

    #[test]
    fn test_unreachable_git_fails_at_first_stage() {
        let git = Git::new("/nonexistent/directory/xyz/git");
        let request = CredentialRequest::new("user", "do-not-leak", "example.com");
        let err = git.provision(&request).unwrap_err();

        assert_eq!(err.stage, ProvisionStage::CacheHelper);
        assert!(matches!(err.source, GitError::Spawn { .. }));

        let message = err.to_string();
        assert!(message.starts_with("enabling credential cache helper failed"));
        assert!(message.contains("credential.helper cache --timeout=86400"));
        assert!(!message.contains("do-not-leak"));
    }
}
