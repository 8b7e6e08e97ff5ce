//! Attaching generated text to the build's result page.

use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use ecow::{EcoString, eco_format};
use loremci::diag::HintedString;

/// The annotation agent invoked by default.
pub const DEFAULT_COMMAND: &str = "buildkite-agent annotate";

/// Whether and how to annotate the build.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AnnotateConfig {
    /// Whether annotation is enabled at all.
    pub enabled: bool,
    /// The shell command the file contents are appended to.
    pub command: String,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self { enabled: false, command: DEFAULT_COMMAND.into() }
    }
}

/// What [`notify`] did.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Annotation {
    /// Annotation is disabled.
    Skipped,
    /// The annotation command ran successfully.
    Sent,
}

/// Passes the contents of the file at `path` to the annotation command.
///
/// The contents are appended to the command as a single shell-escaped
/// argument and run through the platform shell. The call blocks until the
/// command exits.
pub fn notify(config: &AnnotateConfig, path: &Path) -> Result<Annotation, AnnotateError> {
    if !config.enabled {
        tracing::debug!("annotation is disabled");
        return Ok(Annotation::Skipped);
    }

    let contents = fs::read_to_string(path).map_err(|err| AnnotateError::Read {
        path: path.to_path_buf(),
        message: eco_format!("{err}"),
    })?;

    let script = format!("{} {}", config.command, shell_escape::escape(contents.into()));
    tracing::debug!(command = %config.command, "running annotation command");

    let status = shell(&script).status().map_err(|err| AnnotateError::Spawn {
        command: config.command.as_str().into(),
        message: eco_format!("{err}"),
    })?;

    if !status.success() {
        return Err(AnnotateError::Failed {
            command: config.command.as_str().into(),
            status,
        });
    }

    tracing::info!(path = %path.display(), "annotated build");
    Ok(Annotation::Sent)
}

/// A command running `script` in the platform shell.
fn shell(script: &str) -> Command {
    let mut command = if cfg!(windows) {
        let mut command = Command::new("cmd");
        command.arg("/C");
        command
    } else {
        let mut command = Command::new("sh");
        command.arg("-c");
        command
    };
    command.arg(script);
    command
}

/// A failure to annotate the build. Never fatal to a run.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AnnotateError {
    /// The generated file could not be read back.
    Read { path: PathBuf, message: EcoString },
    /// The shell could not be started.
    Spawn { command: EcoString, message: EcoString },
    /// The annotation command exited unsuccessfully.
    Failed { command: EcoString, status: ExitStatus },
}

impl std::error::Error for AnnotateError {}

impl Display for AnnotateError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Read { path, message } => {
                write!(f, "failed to read {} for annotation ({message})", path.display())
            }
            Self::Spawn { command, message } => {
                write!(f, "failed to run annotation command `{command}` ({message})")
            }
            Self::Failed { command, status } => {
                write!(f, "annotation command `{command}` failed ({status})")
            }
        }
    }
}

impl From<AnnotateError> for HintedString {
    fn from(error: AnnotateError) -> Self {
        HintedString::new(eco_format!("{error}"))
            .with_hint("the generated file was written regardless")
    }
}
