//! Configuration for gitcred.
//!
//! [`GitcredConfig`] is layered with figment: built-in defaults, then an
//! optional YAML file, then `GITCRED_*` environment variables.

pub mod config;

pub use config::{ConfigError, GitcredConfig, load_config};
