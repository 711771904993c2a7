//! TeX engine lookup and invocation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::ExportError;

/// Diagnostics longer than this keep only their tail.
const MAX_DIAGNOSTIC_CHARS: usize = 500;

const TRUNCATION_MARKER: &str = "(error message truncated) ... ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMode {
    /// `-halt-on-error`: stop at the first error.
    Halt,
    /// Keep going past errors; TeX still writes whatever it can.
    Continue,
}

#[derive(Debug, Clone)]
pub struct TexEngine {
    /// As configured; used in error messages.
    program: String,
    /// What gets spawned. Path-like programs are absolute, since passes run
    /// with the scratch directory as their cwd.
    executable: PathBuf,
    timeout: Duration,
}

impl TexEngine {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        let program = program.into();
        let executable = if is_path_like(&program) {
            std::path::absolute(&program).unwrap_or_else(|_| PathBuf::from(&program))
        } else {
            PathBuf::from(&program)
        };

        Self {
            program,
            executable,
            timeout,
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Resolve the engine to an executable path.
    ///
    /// A program given as a path is checked directly; a bare name is looked
    /// up with `which` (`where` on Windows), bounded by the engine timeout.
    pub async fn locate(&self) -> Result<PathBuf, ExportError> {
        let not_found = || ExportError::CompilerNotFound {
            program: self.program.clone(),
        };

        if is_path_like(&self.program) {
            return if self.executable.is_file() {
                Ok(self.executable.clone())
            } else {
                Err(not_found())
            };
        }

        let lookup = if cfg!(windows) { "where" } else { "which" };
        let mut command = Command::new(lookup);
        command
            .arg(&self.program)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| ExportError::CompilerTimeout {
                program: self.program.clone(),
                timeout: self.timeout,
            })?
            .map_err(|_| not_found())?;

        if !output.status.success() {
            return Err(not_found());
        }

        // `where` lists every match; the first one is what the shell would run.
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(PathBuf::from)
            .ok_or_else(not_found)
    }

    /// Run one pass of `program` over `tex`, writing output into `workdir`.
    ///
    /// The child is killed if it outlives the engine timeout.
    pub async fn compile(
        &self,
        program: &Path,
        workdir: &Path,
        tex: &Path,
        mode: ErrorMode,
    ) -> Result<(), ExportError> {
        let mut command = Command::new(program);
        command.arg("-interaction=nonstopmode");
        if mode == ErrorMode::Halt {
            command.arg("-halt-on-error");
        }
        command
            .arg("-output-directory")
            .arg(workdir)
            .arg(tex)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        if cfg!(windows) {
            // Stop MiKTeX from prompting to install missing packages.
            command.env("MIKTEX_NOASK", "1");
        }

        debug!(program = %program.display(), tex = %tex.display(), ?mode, "running TeX engine");

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Err(_) => {
                return Err(ExportError::CompilerTimeout {
                    program: self.program.clone(),
                    timeout: self.timeout,
                });
            }
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
                return Err(ExportError::CompilerNotFound {
                    program: self.program.clone(),
                });
            }
            Ok(Err(e)) => return Err(e.into()),
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            return Err(ExportError::CompilerFailed {
                program: self.program.clone(),
                status: output.status.code(),
                diagnostics: diagnostics(&output),
            });
        }

        Ok(())
    }
}

fn is_path_like(program: &str) -> bool {
    Path::new(program).components().count() > 1
}

/// Captured engine output: stderr when there is any, else stdout.
fn diagnostics(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let text = if stderr.trim().is_empty() {
        String::from_utf8_lossy(&output.stdout)
    } else {
        stderr
    };
    truncate_diagnostics(text.trim())
}

/// Keep the last 500 characters; TeX reports the fatal error at the end.
pub fn truncate_diagnostics(text: &str) -> String {
    let count = text.chars().count();
    if count <= MAX_DIAGNOSTIC_CHARS {
        return text.to_string();
    }
    let tail: String = text.chars().skip(count - MAX_DIAGNOSTIC_CHARS).collect();
    format!("{TRUNCATION_MARKER}{tail}")
}
