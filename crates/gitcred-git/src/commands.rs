//! Git command execution wrappers.
//!
//! Provides a thin wrapper around `git` subprocess invocation so that the
//! rest of the crate does not need to deal with `std::process::Command`
//! directly. Every invocation is rendered as a command line (`git config
//! --global ...`) for logs and error messages; secrets are only ever passed
//! through standard input, never as arguments.

use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use thiserror::Error;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when running git commands.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git binary could not be found or spawned.
    #[error("failed to launch {command}: {source}")]
    Spawn {
        /// The rendered command line.
        command: String,
        /// The underlying launch error.
        source: io::Error,
    },

    /// The standard-input pipe of the child could not be opened.
    #[error("there was an error getting stdin of {command}")]
    StdinUnavailable {
        /// The rendered command line.
        command: String,
    },

    /// Waiting on the child or collecting its output failed.
    #[error("failed to collect output of {command}: {source}")]
    Io {
        /// The rendered command line.
        command: String,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The git command exited with a non-zero status.
    #[error("there was an error running {command} (exit code {code:?}): {output}")]
    CommandFailed {
        /// The rendered command line.
        command: String,
        /// The exit code, or `None` if the process was killed by a signal.
        code: Option<i32>,
        /// Combined stdout and stderr of the command.
        output: String,
    },

    /// Writing to the child's stdin failed even though the child exited
    /// successfully, so it may have acted on partial input.
    #[error("failed to write input to {command}: {source}")]
    InputWrite {
        /// The rendered command line.
        command: String,
        /// The underlying write error.
        source: io::Error,
    },
}

impl GitError {
    /// The command line of the invocation that failed.
    pub fn command(&self) -> &str {
        match self {
            GitError::Spawn { command, .. }
            | GitError::StdinUnavailable { command }
            | GitError::Io { command, .. }
            | GitError::CommandFailed { command, .. }
            | GitError::InputWrite { command, .. } => command,
        }
    }

    /// The exit code, if the command ran and exited non-zero.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            GitError::CommandFailed { code, .. } => *code,
            _ => None,
        }
    }
}

/// A specialized `Result` type for git operations.
pub type Result<T> = std::result::Result<T, GitError>;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// The captured result of a successful git invocation.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// The rendered command line.
    pub command: String,
    /// Raw standard output.
    pub stdout: Vec<u8>,
    /// Raw standard error.
    pub stderr: Vec<u8>,
}

impl GitOutput {
    /// Standard output as (lossy) UTF-8.
    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Standard output with surrounding whitespace removed.
    pub fn stdout_trimmed(&self) -> String {
        self.stdout_str().trim().to_string()
    }
}

fn combine(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(stderr));
    combined.trim().to_string()
}

// ---------------------------------------------------------------------------
// Git handle
// ---------------------------------------------------------------------------

/// A handle on the git executable.
///
/// Holds the program to run and environment overrides applied to every
/// invocation. Cloning is cheap; [`Git::env`] returns a modified copy.
#[derive(Debug, Clone)]
pub struct Git {
    program: OsString,
    envs: Vec<(OsString, OsString)>,
}

impl Default for Git {
    fn default() -> Self {
        Self::new("git")
    }
}

impl Git {
    /// Create a handle running `program` (looked up on `PATH` if relative).
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            envs: Vec::new(),
        }
    }

    /// Set an environment variable for every invocation.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitcred_git::Git;
    ///
    /// let git = Git::default().env("HOME", "/tmp/isolated-home");
    /// assert_eq!(git.command_line(&["--version"]), "git --version");
    /// ```
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// The program this handle runs.
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Render `args` as the command line used in logs and errors.
    pub fn command_line(&self, args: &[&str]) -> String {
        let mut line = self.program.to_string_lossy().into_owned();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    /// Run git with `args` and no input, capturing stdout and stderr.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Spawn`] if git cannot be started, or
    /// [`GitError::CommandFailed`] if it exits with a non-zero status.
    pub fn run(&self, args: &[&str]) -> Result<GitOutput> {
        let command = self.command_line(args);
        debug!(%command, "running git");

        let output = self
            .command(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| GitError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                code: output.status.code(),
                output: combine(&output.stdout, &output.stderr),
                command,
            });
        }

        Ok(GitOutput {
            command,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    /// Run git with `args`, streaming `input` into its standard input.
    ///
    /// The input is written from a dedicated thread while this thread drains
    /// stdout and stderr and waits for exit, so neither side can block on a
    /// full pipe. The writer owns the stdin handle and drops it on every path,
    /// so git always observes end of input.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Spawn`] or [`GitError::StdinUnavailable`] before
    /// anything is written, [`GitError::CommandFailed`] on a non-zero exit,
    /// and [`GitError::InputWrite`] if git succeeded but the input could not
    /// be fully written.
    pub fn run_with_input(&self, args: &[&str], input: &[u8]) -> Result<GitOutput> {
        let command = self.command_line(args);
        debug!(%command, "running git with piped input");

        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| GitError::Spawn {
                command: command.clone(),
                source,
            })?;

        let Some(mut stdin) = child.stdin.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(GitError::StdinUnavailable { command });
        };

        let (output, written) = thread::scope(|scope| {
            let writer = scope.spawn(move || {
                let result = stdin.write_all(input).and_then(|()| stdin.flush());
                drop(stdin);
                result
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (output, written)
        });

        let output = output.map_err(|source| GitError::Io {
            command: command.clone(),
            source,
        })?;

        if !output.status.success() {
            if let Err(err) = &written {
                warn!(%command, error = %err, "writing to git stdin failed");
            }
            return Err(GitError::CommandFailed {
                code: output.status.code(),
                output: combine(&output.stdout, &output.stderr),
                command,
            });
        }

        if let Err(source) = written {
            return Err(GitError::InputWrite { command, source });
        }

        Ok(GitOutput {
            command,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
