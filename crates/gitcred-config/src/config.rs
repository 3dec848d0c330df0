//! Configuration types and loading for gitcred.
//!
//! The main entry point is [`GitcredConfig`], loaded with [`load_config`].
//!
//! Precedence (lowest to highest):
//! 1. Built-in defaults
//! 2. The YAML file (`--config` path, or `gitcred.yaml` found in the working
//!    directory or one of its parents)
//! 3. `GITCRED_*` environment variables
//!
//! Command-line flags are applied on top by the binary.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "gitcred.yaml";

/// Prefix of environment variables overriding configuration keys.
pub const ENV_PREFIX: &str = "GITCRED_";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A provider yielded data that does not fit [`GitcredConfig`].
    #[error("failed to load configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue {
        /// The configuration key that had an invalid value.
        key: String,
        /// A description of why the value is invalid.
        reason: String,
    },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Config struct
// ---------------------------------------------------------------------------

/// Settings for provisioning credentials.
///
/// All fields use `serde` defaults so that a partially-specified YAML file
/// deserializes with sensible values. Scalars are accepted as text, so
/// `username: 12345` or `GITCRED_USERNAME=12345` yields `"12345"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitcredConfig {
    /// The git executable to run.
    #[serde(default = "default_git_program", deserialize_with = "scalar_string")]
    pub git_program: String,

    /// Username presented with the token.
    #[serde(default = "default_username", deserialize_with = "scalar_string")]
    pub username: String,

    /// Host the credential is provisioned for.
    #[serde(default = "default_hostname", deserialize_with = "scalar_string")]
    pub hostname: String,

    /// Environment variable holding the token.
    #[serde(default = "default_token_env", deserialize_with = "scalar_string")]
    pub token_env: String,
}

impl Default for GitcredConfig {
    fn default() -> Self {
        Self {
            git_program: default_git_program(),
            username: default_username(),
            hostname: default_hostname(),
            token_env: default_token_env(),
        }
    }
}

fn default_git_program() -> String {
    "git".to_string()
}

fn default_username() -> String {
    "x-access-token".to_string()
}

fn default_hostname() -> String {
    "github.com".to_string()
}

fn default_token_env() -> String {
    "GITCRED_TOKEN".to_string()
}

/// Deserialize any scalar (string, integer, float, bool) as its text.
///
/// YAML and environment providers type bare numbers and booleans, which
/// would otherwise fail to land in a `String` field.
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScalarString;

    impl Visitor<'_> for ScalarString {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number or boolean")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<String, E> {
            Ok(v)
        }

        fn visit_char<E: de::Error>(self, v: char) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(ScalarString)
}

impl GitcredConfig {
    /// Check values that would make every git invocation fail.
    pub fn validate(&self) -> Result<()> {
        if self.git_program.trim().is_empty() {
            return Err(invalid("git_program", "must not be empty"));
        }
        if self.token_env.is_empty() {
            return Err(invalid("token_env", "must not be empty"));
        }
        if self.token_env.contains(['=', '\0']) {
            return Err(invalid(
                "token_env",
                "must not contain '=' or NUL characters",
            ));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// The layered providers for `path` (or the default file), without
/// extracting.
///
/// The token variable itself is never read into configuration.
pub fn figment(path: Option<&Path>) -> Figment {
    let file = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
    Figment::new()
        .merge(Serialized::defaults(GitcredConfig::default()))
        .merge(Yaml::file(file))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["token"]))
}

/// Extract and validate a [`GitcredConfig`] from `figment`.
pub fn extract(figment: &Figment) -> Result<GitcredConfig> {
    let config: GitcredConfig = figment.extract().map_err(Box::new)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from the standard layers.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if `path` is given but missing,
/// [`ConfigError::Extract`] for malformed data, and
/// [`ConfigError::InvalidValue`] when validation fails.
pub fn load_config(path: Option<&Path>) -> Result<GitcredConfig> {
    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
    }
    extract(&figment(path))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_yaml(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("gitcred.yaml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let cfg = GitcredConfig::default();
        assert_eq!(cfg.git_program, "git");
        assert_eq!(cfg.username, "x-access-token");
        assert_eq!(cfg.hostname, "github.com");
        assert_eq!(cfg.token_env, "GITCRED_TOKEN");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_yaml(&dir, "hostname: git.example.com\n");

        let figment = Figment::new()
            .merge(Serialized::defaults(GitcredConfig::default()))
            .merge(Yaml::file(&path));
        let cfg = extract(&figment).unwrap();

        assert_eq!(cfg.hostname, "git.example.com");
        assert_eq!(cfg.username, "x-access-token");
        assert_eq!(cfg.git_program, "git");
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_yaml(
            &dir,
            "username: deploy-bot\ngit_program: /usr/bin/git\ntoken_env: DEPLOY_TOKEN\n",
        );

        let cfg = load_config(Some(path.as_path())).unwrap();
        assert_eq!(cfg.username, "deploy-bot");
        assert_eq!(cfg.git_program, "/usr/bin/git");
        assert_eq!(cfg.token_env, "DEPLOY_TOKEN");
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let path = PathBuf::from("/nonexistent/path/gitcred.yaml");
        let err = load_config(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_later_layers_win() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_yaml(&dir, "username: from-file\nhostname: file.example.com\n");

        let cfg = extract(&figment(Some(path.as_path())).merge(("username", "from-override"))).unwrap();
        assert_eq!(cfg.username, "from-override");
        assert_eq!(cfg.hostname, "file.example.com");
    }

    #[test]
    fn test_numeric_yaml_values_are_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_yaml(&dir, "username: 12345\ntoken_env: true\n");

        let cfg = load_config(Some(path.as_path())).unwrap();
        assert_eq!(cfg.username, "12345");
        assert_eq!(cfg.token_env, "true");
    }

    #[test]
    fn test_numeric_env_values_are_text() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(DEFAULT_CONFIG_FILE, "hostname: git.example.com\n")?;
            jail.set_env("GITCRED_USERNAME", "12345");
            jail.set_env("GITCRED_GIT_PROGRAM", "true");

            let cfg = load_config(None).unwrap();
            assert_eq!(cfg.username, "12345");
            assert_eq!(cfg.git_program, "true");
            assert_eq!(cfg.hostname, "git.example.com");
            Ok(())
        });
    }

    #[test]
    fn test_env_ignores_token_variable() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("GITCRED_TOKEN", "secret-token");

            let cfg = load_config(None).unwrap();
            assert_eq!(cfg, GitcredConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_malformed_value_is_extract_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_yaml(&dir, "username:\n  - not\n  - a string\n");

        let err = load_config(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Extract(_)), "got: {err:?}");
    }

    #[test]
    fn test_validate_rejects_empty_program() {
        let cfg = GitcredConfig {
            git_program: "  ".to_string(),
            ..GitcredConfig::default()
        };
        match cfg.validate().unwrap_err() {
            ConfigError::InvalidValue { key, .. } => assert_eq!(key, "git_program"),
            other => panic!("expected InvalidValue, got: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_token_env() {
        for token_env in ["", "A=B"] {
            let cfg = GitcredConfig {
                token_env: token_env.to_string(),
                ..GitcredConfig::default()
            };
            assert!(
                matches!(cfg.validate(), Err(ConfigError::InvalidValue { ref key, .. }) if key == "token_env"),
                "token_env {token_env:?} should be rejected"
            );
        }
    }
}
