use std::ffi::{OsStr, OsString};
use std::process::{Command, Stdio};

use crate::foundation::error::{QuizError, QuizResult};

/// A program plus its arguments, built before anything is spawned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path.
    pub program: String,
    /// Arguments in order.
    pub args: Vec<OsString>,
}

impl CommandSpec {
    /// Spec for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Arguments as lossy UTF-8, for logs and assertions.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// `true` if `needle` appears as a whole argument.
    pub fn has_arg(&self, needle: &str) -> bool {
        self.args.iter().any(|a| a == needle)
    }
}

/// Result of a finished process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Exit code; `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    /// Captured diagnostic stream.
    pub stderr: String,
}

impl CommandOutcome {
    /// Successful outcome with empty diagnostics.
    pub fn ok() -> Self {
        Self {
            code: Some(0),
            stderr: String::new(),
        }
    }

    /// Failed outcome with `code` and `stderr`.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stderr: stderr.into(),
        }
    }

    /// `true` when the process exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human-readable exit status.
    pub fn status_text(&self) -> String {
        match self.code {
            Some(c) => format!("exit code {c}"),
            None => "terminated by signal".to_owned(),
        }
    }

    /// Turn a failed outcome into [`QuizError::Process`].
    pub fn into_result(self, program: &str) -> QuizResult<()> {
        if self.success() {
            return Ok(());
        }
        Err(QuizError::process(
            program,
            self.status_text(),
            self.stderr.trim(),
        ))
    }
}

/// Runs external processes to completion.
///
/// Implementations block until the process exits. A non-zero exit is reported through
/// [`CommandOutcome`], not as an `Err`; `Err` is reserved for failing to run the program at all.
pub trait CommandRunner {
    /// Run `spec` and wait for it to exit.
    fn run(&mut self, spec: &CommandSpec) -> QuizResult<CommandOutcome>;
}

/// [`CommandRunner`] backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&mut self, spec: &CommandSpec) -> QuizResult<CommandOutcome> {
        tracing::debug!(program = %spec.program, args = ?spec.args_lossy(), "spawning process");
        let output = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                QuizError::config(format!(
                    "failed to spawn {} (is it installed and on PATH?): {e}",
                    spec.program
                ))
            })?;
        Ok(CommandOutcome {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/command.rs"]
mod tests;
