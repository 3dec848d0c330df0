//! Output helpers for the `gitcred` CLI.

use std::io::{self, Write};

use serde::Serialize;

/// Placeholder printed instead of a secret.
pub const MASK: &str = "********";

/// Print a value as pretty-printed JSON to stdout.
///
/// Terminates the process with exit code 1 if serialization fails.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// `value`, or [`MASK`] unless `reveal` is set.
pub fn masked(value: &str, reveal: bool) -> &str {
    if reveal { value } else { MASK }
}
