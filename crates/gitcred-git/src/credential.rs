//! Credential records and git-credential protocol framing.
//!
//! git's credential helpers exchange newline-terminated `key=value` lines on
//! stdin/stdout. [`CredentialRequest`] renders the lines fed to
//! `git credential approve`; [`CredentialRecord`] parses what
//! `git credential fill` prints back.

use std::fmt;

use chrono::{DateTime, Utc};

const REDACTED: &str = "[REDACTED]";

// ---------------------------------------------------------------------------
// CredentialRequest
// ---------------------------------------------------------------------------

/// One token to provision for a host.
///
/// The secret is never logged and is hidden from the `Debug` output.
/// Emptiness of `username` and `secret` is not checked here; callers are
/// expected to validate their input.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRequest {
    /// Account presented to the host (e.g. `x-access-token`).
    pub username: String,
    /// Opaque bearer token.
    pub secret: String,
    /// When the token stops being valid; `None` means no expiry.
    pub expiry: Option<DateTime<Utc>>,
    /// Bare host name, used verbatim.
    pub hostname: String,
}

impl CredentialRequest {
    /// Build a request without an expiry.
    pub fn new(
        username: impl Into<String>,
        secret: impl Into<String>,
        hostname: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
            expiry: None,
            hostname: hostname.into(),
        }
    }

    /// Set the expiry of the token.
    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// The HTTPS URL the credential applies to.
    pub fn url(&self) -> String {
        https_url(&self.hostname)
    }

    /// Render the protocol lines for `git credential approve`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitcred_git::CredentialRequest;
    ///
    /// let request = CredentialRequest::new("x-access-token", "s3cret", "example.com");
    /// assert_eq!(
    ///     request.approve_input(),
    ///     "url=https://example.com\nusername=x-access-token\npassword=s3cret\n"
    /// );
    /// ```
    pub fn approve_input(&self) -> String {
        let mut input = format!(
            "url={}\nusername={}\npassword={}\n",
            self.url(),
            self.username,
            self.secret
        );
        if let Some(expiry) = self.expiry {
            input.push_str(&format!("password_expiry_utc={}\n", expiry.timestamp()));
        }
        input
    }
}

impl fmt::Debug for CredentialRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRequest")
            .field("username", &self.username)
            .field("secret", &REDACTED)
            .field("expiry", &self.expiry)
            .field("hostname", &self.hostname)
            .finish()
    }
}

/// `https://<hostname>`.
pub fn https_url(hostname: &str) -> String {
    format!("https://{hostname}")
}

/// Protocol lines asking `git credential fill` for a host/username pair.
pub(crate) fn fill_input(hostname: &str, username: &str) -> String {
    format!("url={}\nusername={username}\n", https_url(hostname))
}

// ---------------------------------------------------------------------------
// CredentialRecord
// ---------------------------------------------------------------------------

/// A credential as reported by `git credential fill`.
///
/// Keys keep the order git printed them in. The password is hidden from the
/// `Debug` output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialRecord {
    fields: Vec<(String, String)>,
}

impl CredentialRecord {
    /// Parse `key=value` lines. Blank lines and lines without `=` are
    /// skipped; only the first `=` separates key from value.
    pub fn parse(text: &str) -> Self {
        let fields = text
            .lines()
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Self { fields }
    }

    /// The value of `key`; for repeated keys the last one wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All fields in the order git printed them.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn protocol(&self) -> Option<&str> {
        self.get("protocol")
    }

    pub fn host(&self) -> Option<&str> {
        self.get("host")
    }

    pub fn username(&self) -> Option<&str> {
        self.get("username")
    }

    pub fn password(&self) -> Option<&str> {
        self.get("password")
    }

    /// The `password_expiry_utc` field, if present and a valid timestamp.
    pub fn password_expiry(&self) -> Option<DateTime<Utc>> {
        let secs = self.get("password_expiry_utc")?.parse::<i64>().ok()?;
        DateTime::from_timestamp(secs, 0)
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in self.iter() {
            if key == "password" {
                map.entry(&key, &REDACTED);
            } else {
                map.entry(&key, &value);
            }
        }
        map.finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_approve_input_without_expiry() {
        let request = CredentialRequest::new("x-access-token", "token", "example.com");
        let input = request.approve_input();
        assert_eq!(
            input,
            "url=https://example.com\nusername=x-access-token\npassword=token\n"
        );
        assert!(!input.contains("password_expiry_utc"));
    }

    #[test]
    fn test_approve_input_with_expiry() {
        let expiry = DateTime::from_timestamp(1_700_000_123, 999_000_000).unwrap();
        let request =
            CredentialRequest::new("x-access-token", "token", "example.com").with_expiry(expiry);
        assert_eq!(
            request.approve_input(),
            "url=https://example.com\n\
             username=x-access-token\n\
             password=token\n\
             password_expiry_utc=1700000123\n"
        );
    }

    #[test]
    fn test_hostname_used_verbatim() {
        let request = CredentialRequest::new("user", "token", "git.example.com:8443");
        assert_eq!(request.url(), "https://git.example.com:8443");
    }

    #[test]
    fn test_request_debug_hides_secret() {
        let request = CredentialRequest::new("user", "super-secret-token", "example.com");
        let debug = format!("{request:?}");
        assert!(!debug.contains("super-secret-token"), "{debug}");
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("example.com"));
    }

    #[test]
    fn test_fill_input() {
        assert_eq!(
            fill_input("example.com", "x-access-token"),
            "url=https://example.com\nusername=x-access-token\n"
        );
    }

    #[test]
    fn test_parse_fill_output() {
        let record = CredentialRecord::parse(
            "protocol=https\nhost=example.com\nusername=x-access-token\n\
             password=to=ken\npassword_expiry_utc=1700000123\n\n",
        );
        assert_eq!(record.protocol(), Some("https"));
        assert_eq!(record.host(), Some("example.com"));
        assert_eq!(record.username(), Some("x-access-token"));
        assert_eq!(record.password(), Some("to=ken"));
        assert_eq!(
            record.password_expiry(),
            DateTime::from_timestamp(1_700_000_123, 0)
        );
        assert_eq!(record.iter().count(), 5);
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let record = CredentialRecord::parse("garbage\nhost=a\nhost=b\npassword_expiry_utc=soon\n");
        assert_eq!(record.host(), Some("b"));
        assert_eq!(record.password(), None);
        assert_eq!(record.password_expiry(), None);
    }

    #[test]
    fn test_record_debug_hides_password() {
        let record = CredentialRecord::parse("host=example.com\npassword=hunter2\n");
        let debug = format!("{record:?}");
        assert!(!debug.contains("hunter2"), "{debug}");
        assert!(debug.contains("example.com"));
    }
}
