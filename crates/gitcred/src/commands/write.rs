//! `gitcred write` -- provision a token into git's credential cache.

use std::env;
use std::io::{self, BufRead};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use gitcred_git::CredentialRequest;
use tracing::debug;

use crate::cli::WriteArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `gitcred write` command.
pub fn run(ctx: &RuntimeContext, args: &WriteArgs) -> Result<()> {
    let (username, hostname) = ctx.resolve_target(&args.target);
    if username.is_empty() {
        bail!("username must not be empty");
    }
    if hostname.is_empty() {
        bail!("hostname must not be empty");
    }

    let expiry = args.expiry.as_deref().map(parse_expiry).transpose()?;

    let secret = if args.token_stdin {
        read_token(io::stdin().lock())?
    } else {
        let var = &ctx.config.token_env;
        env::var(var)
            .with_context(|| format!("no token found: set {var} or pass --token-stdin"))?
    };
    if secret.is_empty() {
        bail!("token must not be empty");
    }

    let mut request = CredentialRequest::new(username, secret, hostname);
    if let Some(expiry) = expiry {
        request = request.with_expiry(expiry);
    }

    debug!(?request, "provisioning credential");
    ctx.git()
        .provision(&request)
        .context("failed to provision credential")?;

    let expiry = request.expiry.map(|e| e.to_rfc3339());
    if ctx.json {
        output_json(&serde_json::json!({
            "url": request.url(),
            "username": request.username,
            "hostname": request.hostname,
            "expiry": expiry,
        }));
    } else if !ctx.quiet {
        match expiry {
            Some(expiry) => println!(
                "Cached credential for {} at {} (expires {})",
                request.username,
                request.url(),
                expiry
            ),
            None => println!(
                "Cached credential for {} at {}",
                request.username,
                request.url()
            ),
        }
    }

    Ok(())
}

/// Parse an expiry given as Unix seconds or an RFC 3339 timestamp.
pub fn parse_expiry(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0)
            .with_context(|| format!("expiry out of range: {value}"));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("invalid expiry '{value}': expected Unix seconds or RFC 3339"))
}

/// Read the token from the first line of `reader`.
fn read_token<R: BufRead>(mut reader: R) -> Result<String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("failed to read token from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_expiry_unix_seconds() {
        let expiry = parse_expiry("1700000000").unwrap();
        assert_eq!(expiry.timestamp(), 1_700_000_000);
    }

    #[test]
    fn parse_expiry_rfc3339() {
        let expiry = parse_expiry("2023-11-14T23:13:20+01:00").unwrap();
        assert_eq!(expiry.timestamp(), 1_700_000_000);
    }

    #[test]
    fn parse_expiry_rejects_garbage() {
        let err = parse_expiry("tomorrow").unwrap_err();
        assert!(err.to_string().contains("tomorrow"));
    }

    #[test]
    fn read_token_takes_first_line() {
        let token = read_token("ghs_abc\r\nignored\n".as_bytes()).unwrap();
        assert_eq!(token, "ghs_abc");
    }

    #[test]
    fn read_token_empty_input() {
        assert_eq!(read_token("".as_bytes()).unwrap(), "");
    }
}
