//! Command execution
//!
//! Runs the user's command inside a checkout and reports how it exited.

use std::fmt;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, error};

/// Return code recorded when the command could not be started at all
pub const SPAWN_FAILURE_CODE: i32 = 127;

/// How the child's output is handled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CaptureMode {
    /// Collect stdout and stderr in memory
    #[default]
    Buffered,
    /// Let the child write straight to our stdout and stderr
    Passthrough,
}

/// Command line parsing errors
#[derive(Error, Debug)]
pub enum CommandLineError {
    #[error("command is empty")]
    Empty,

    #[error("failed to parse command: {0}")]
    Parse(#[from] shell_words::ParseError),
}

/// A command split into program and arguments, without involving a shell
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Split `line` on whitespace, honoring quotes and escapes
    pub fn parse(line: &str) -> Result<Self, CommandLineError> {
        let mut words = shell_words::split(line)?.into_iter();
        let program = words.next().ok_or(CommandLineError::Empty)?;
        Ok(Self {
            program,
            args: words.collect(),
        })
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = std::iter::once(&self.program).chain(&self.args);
        f.write_str(&shell_words::join(words))
    }
}

/// What a finished command left behind
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecOutput {
    pub return_code: i32,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

/// Runs one [`CommandLine`] in any number of directories
#[derive(Clone, Debug)]
pub struct CommandRunner {
    command: CommandLine,
}

impl CommandRunner {
    pub fn new(command: CommandLine) -> Self {
        Self { command }
    }

    /// Run the command in `working_dir` and wait for it to exit
    ///
    /// Never fails: a command that cannot be spawned is reported with
    /// [`SPAWN_FAILURE_CODE`] so it counts as a failed run.
    pub async fn execute(&self, working_dir: &Path, mode: CaptureMode) -> ExecOutput {
        debug!("Running `{}` in {}", self.command, working_dir.display());

        let mut cmd = Command::new(&self.command.program);
        cmd.args(&self.command.args).current_dir(working_dir);

        match mode {
            CaptureMode::Buffered => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped());

                match cmd.output().await {
                    Ok(output) => ExecOutput {
                        return_code: return_code(output.status),
                        stdout: Some(String::from_utf8_lossy(&output.stdout).into_owned()),
                        stderr: Some(String::from_utf8_lossy(&output.stderr).into_owned()),
                    },
                    Err(e) => ExecOutput {
                        return_code: SPAWN_FAILURE_CODE,
                        stdout: Some(String::new()),
                        stderr: Some(format!("failed to run {}: {}", self.command.program, e)),
                    },
                }
            }
            CaptureMode::Passthrough => {
                cmd.stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());

                let return_code = match cmd.status().await {
                    Ok(status) => return_code(status),
                    Err(e) => {
                        error!("Failed to run {}: {}", self.command.program, e);
                        SPAWN_FAILURE_CODE
                    }
                };

                ExecOutput {
                    return_code,
                    stdout: None,
                    stderr: None,
                }
            }
        }
    }
}

/// Exit code, or `128 + signal` for a child killed by a signal
fn return_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}
