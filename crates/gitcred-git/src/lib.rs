//! Token-based HTTPS authentication for a local git installation.
//!
//! This crate drives git's own `credential-cache` helper instead of writing
//! secrets to disk. [`provision`] enables the cache helper, rewrites
//! `ssh://git@<host>` remotes to HTTPS, and feeds the token into the cache
//! through `git credential approve`.
//!
//! All git invocations go through the [`Git`] handle, which can carry
//! environment overrides (for example an isolated `HOME`).

pub mod commands;
pub mod credential;
pub mod provision;
pub mod query;

pub use commands::{Git, GitError, GitOutput};
pub use credential::{CredentialRecord, CredentialRequest};
pub use provision::{CACHE_TIMEOUT_SECS, ProvisionError, ProvisionStage, provision};
