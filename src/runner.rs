//! External command execution.
//! Used for the package-manager install and `git init`; the materializer
//! never runs commands.

use crate::error::{Error, Result};
use log::debug;
use std::path::Path;
use std::process::{Command, Stdio};

/// Captured output of a successful command.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

pub trait CommandRunner {
    /// Runs `command` in `working_dir` (or the process directory when `None`).
    ///
    /// # Errors
    /// * `Error::CommandError` if the command cannot be parsed or started, or exits nonzero
    fn run(&self, command: &str, working_dir: Option<&Path>) -> Result<CommandOutput>;
}

/// Runs commands as child processes. The command line is split with
/// shell-words and executed directly, without a shell.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &str, working_dir: Option<&Path>) -> Result<CommandOutput> {
        let command_error = |message: String| Error::CommandError {
            command: command.to_string(),
            message,
        };

        let args = shell_words::split(command)
            .map_err(|e| command_error(format!("invalid command line: {e}")))?;
        let (program, args) =
            args.split_first().ok_or_else(|| command_error("empty command".to_string()))?;

        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null());
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        debug!("Running '{}' in {:?}", command, working_dir);
        let output = cmd.output().map_err(|e| command_error(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            let detail = if stderr.trim().is_empty() { stdout.trim() } else { stderr.trim() };
            return Err(command_error(format!("{}\n{}", output.status, detail)));
        }

        Ok(CommandOutput { stdout, stderr })
    }
}
