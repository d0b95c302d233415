//! External command execution.
//!
//! Every shelled-out step of the pipeline goes through [`CommandRunner::run`]:
//! the program is resolved on `PATH`, stdout and stderr are drained
//! concurrently and captured, and the child is killed when the timeout elapses.

use crate::bundler::error::{Error, Result};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
    time::Duration,
};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
};

/// Default timeout for a single external command (20 minutes).
/// `npm i -g pkg` and a cold `pkg` run both download large artifacts.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(1200);

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandSpec {
    /// Creates a command with no arguments.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Parses a whitespace separated command line such as `npm i -g pkg`.
    ///
    /// Returns `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program).args(parts))
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program name as given.
    pub fn program(&self) -> &std::ffi::OsStr {
        &self.program
    }

    /// Human readable command line, used in logs and errors.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|s| s.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Resolves the program against `PATH`.
    ///
    /// Falls back to the bare name so the spawn error names what was missing.
    /// On Windows this is what finds `npm.cmd` for a plain `npm`.
    fn resolve_program(&self) -> PathBuf {
        let program = Path::new(&self.program);
        if program.components().count() > 1 {
            return program.to_path_buf();
        }
        which::which(&self.program).unwrap_or_else(|_| program.to_path_buf())
    }
}

/// Captured result of a successful command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit status of the process.
    pub status: ExitStatus,
    /// Captured stdout lines.
    pub stdout: Vec<String>,
    /// Captured stderr lines.
    pub stderr: Vec<String>,
}

/// Runs external commands one at a time.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    timeout: Duration,
    fail_on_stderr: bool,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_COMMAND_TIMEOUT,
            fail_on_stderr: true,
        }
    }
}

impl CommandRunner {
    /// Creates a runner.
    ///
    /// With `fail_on_stderr` set, any stderr output is fatal even when the
    /// process exits successfully.
    pub fn new(timeout: Duration, fail_on_stderr: bool) -> Self {
        Self {
            timeout,
            fail_on_stderr,
        }
    }

    /// Runs `spec` to completion.
    ///
    /// stdout lines are logged at debug level as they arrive. A non-zero exit,
    /// a timeout, or (when enabled) stderr output is returned as an error.
    pub async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        let command_line = spec.display();
        log::info!("Running `{}`", command_line);

        let mut command = Command::new(spec.resolve_program());
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|error| Error::CommandFailed {
            command: command_line.clone(),
            error,
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let completion = async {
            // Both pipes must be drained before waiting or a chatty child blocks
            let (stdout_lines, stderr_lines) =
                tokio::join!(collect_lines(stdout, false), collect_lines(stderr, true));
            let status = child.wait().await;
            (stdout_lines, stderr_lines, status)
        };

        let outcome = tokio::time::timeout(self.timeout, completion).await;
        let (stdout, stderr, status) = match outcome {
            Ok(result) => result,
            Err(_elapsed) => {
                log::warn!(
                    "`{}` timed out after {}s, terminating...",
                    command_line,
                    self.timeout.as_secs()
                );
                if let Err(e) = child.kill().await {
                    log::warn!("Failed to kill `{}`: {}", command_line, e);
                }
                return Err(Error::CommandTimeout {
                    command: command_line,
                    timeout: self.timeout,
                });
            }
        };

        let status = status.map_err(|error| Error::CommandFailed {
            command: command_line.clone(),
            error,
        })?;

        if !status.success() {
            return Err(Error::CommandExit {
                command: command_line,
                code: status.code().unwrap_or(-1),
                stderr: stderr.join("\n"),
            });
        }

        if self.fail_on_stderr && stderr.iter().any(|line| !line.trim().is_empty()) {
            return Err(Error::CommandStderr {
                command: command_line,
                stderr: stderr.join("\n"),
            });
        }

        Ok(CommandOutput {
            status,
            stdout,
            stderr,
        })
    }
}

/// Reads `reader` to EOF, one line at a time.
///
/// Bytes that are not UTF-8 are replaced rather than ending the read, so the
/// child never sees a closed pipe.
async fn collect_lines<R>(reader: Option<R>, is_stderr: bool) -> Vec<String>
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return Vec::new();
    };

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut captured = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf)
                    .trim_end_matches(['\n', '\r'])
                    .to_string();
                if is_stderr {
                    log::debug!("stderr: {}", line);
                } else {
                    log::debug!("stdout: {}", line);
                }
                captured.push(line);
            }
            Err(e) => {
                log::warn!("Stopped reading command output: {}", e);
                break;
            }
        }
    }
    captured
}
