//! Process execution behind a trait so backends can be driven by a fake in tests

use std::fmt;
use std::io;
use std::process::Command;

/// A fully described external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Best available diagnostic text: stderr, then stdout, then the exit code
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs an [`Invocation`] to completion
///
/// `Err` means the process could not be spawned at all (e.g. `NotFound`);
/// a non-zero exit is reported through [`CommandOutput::success`].
pub trait CommandRunner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> io::Result<CommandOutput>;
}

/// Runs commands on the host, capturing stdout and stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<CommandOutput> {
        tracing::debug!(command = %invocation, "running external command");

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .output()?;
        let result = CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        tracing::debug!(
            program = %invocation.program,
            success = result.success,
            code = ?result.code,
            "external command finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_whitespace() {
        let inv = Invocation::new("git").args(["clone", "--branch", "main"]).arg("my dir");
        assert_eq!(inv.to_string(), "git clone --branch main 'my dir'");
    }

    #[test]
    fn test_builder_collects_program_and_args() {
        let inv = Invocation::new("nix").arg("build").args(["--impure", "--no-link"]);
        assert_eq!(
            inv,
            Invocation {
                program: "nix".into(),
                args: vec!["build".into(), "--impure".into(), "--no-link".into()],
            }
        );
    }

    #[test]
    fn test_diagnostic_prefers_stderr() {
        let out = CommandOutput {
            success: false,
            code: Some(1),
            stdout: "partial".into(),
            stderr: "fatal: repository not found\n".into(),
        };
        assert_eq!(out.diagnostic(), "fatal: repository not found");

        let silent = CommandOutput {
            success: false,
            code: Some(128),
            ..Default::default()
        };
        assert_eq!(silent.diagnostic(), "exited with status 128");
    }

    #[test]
    fn test_system_runner_reports_missing_program() {
        let err = SystemRunner
            .run(&Invocation::new("definitely-not-a-real-tool-4242"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
