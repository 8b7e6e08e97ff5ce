//! Validating the raw arguments into the configuration of a run.

use std::fmt::{self, Display, Formatter};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use ecow::{EcoString, eco_format};
use loremci::Unit;
use loremci::diag::HintedString;
use loremci_kit::annotate::AnnotateConfig;
use loremci_kit::bootstrap::BootstrapConfig;

use crate::args::CliArguments;

/// The variable selecting what to generate.
pub const ACTION_VAR: &str = "LOREMIPSUM_ACTION";

/// The plugin name that marks a containerized build.
const CONTAINER_PLUGIN: &str = "DOCKER";

/// What a run should generate.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Action {
    /// A sentence of exactly this many characters.
    Sentence(NonZeroUsize),
    /// A paragraph of exactly this many characters.
    Paragraph(NonZeroUsize),
}

impl Action {
    /// The unit the action generates.
    pub fn unit(self) -> Unit {
        match self {
            Self::Sentence(_) => Unit::Sentence,
            Self::Paragraph(_) => Unit::Paragraph,
        }
    }
}

/// The validated configuration of a run.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
    /// What to generate.
    pub action: Action,
    /// Where to write the result.
    pub output_dir: PathBuf,
    /// How to make the corpus ready.
    pub bootstrap: BootstrapConfig,
    /// Whether and how to annotate the build.
    pub annotate: AnnotateConfig,
}

impl Config {
    /// Validates the arguments. Relative paths are resolved against
    /// `workdir`.
    pub fn new(args: &CliArguments, workdir: &Path) -> Result<Self, ConfigError> {
        let action = parse_action(args)?;

        let install_dir = match &args.install_dir {
            Some(dir) => workdir.join(dir),
            None => dirs::cache_dir()
                .map(|dir| dir.join("loremci"))
                .unwrap_or_else(|| workdir.join(".loremci")),
        };

        let container = args
            .plugin_name
            .as_deref()
            .is_some_and(|plugin| plugin.trim().eq_ignore_ascii_case(CONTAINER_PLUGIN));

        Ok(Self {
            action,
            output_dir: workdir.join(&args.output_dir),
            bootstrap: BootstrapConfig {
                workdir: workdir.to_path_buf(),
                root: args.root.clone(),
                repo_name: args.repo_name.clone(),
                reinstall: is_truthy(&args.reinstall),
                container,
                install_dir,
            },
            annotate: AnnotateConfig {
                enabled: is_truthy(&args.annotate),
                command: args.annotate_command.clone(),
            },
        })
    }
}

/// Reads the action and the length variable belonging to it.
fn parse_action(args: &CliArguments) -> Result<Action, ConfigError> {
    let name = required(ACTION_VAR, args.action.as_deref())?;
    match Unit::from_name(name.trim()) {
        Some(Unit::Sentence) => {
            let chars = parse_length("SENTENCE_MAX_CHAR", args.sentence_max_char.as_deref())?;
            Ok(Action::Sentence(chars))
        }
        Some(Unit::Paragraph) => {
            let chars =
                parse_length("PARAGRAPH_MAX_CHAR", args.paragraph_max_char.as_deref())?;
            Ok(Action::Paragraph(chars))
        }
        None => Err(ConfigError::UnknownAction(name.into())),
    }
}

/// Rejects missing and empty values.
fn required<'a>(var: &'static str, value: Option<&'a str>) -> Result<&'a str, ConfigError> {
    match value {
        None => Err(ConfigError::Missing(var)),
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty(var)),
        Some(value) => Ok(value),
    }
}

/// Parses a required, positive character count.
fn parse_length(var: &'static str, value: Option<&str>) -> Result<NonZeroUsize, ConfigError> {
    let value = required(var, value)?.trim();
    let chars: i128 = value
        .parse()
        .map_err(|_| ConfigError::NotAnInteger { var, value: value.into() })?;
    usize::try_from(chars)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| ConfigError::NotPositive { var, value: value.into() })
}

/// Whether a boolean-like setting is enabled.
pub fn is_truthy(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// An invalid configuration value.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ConfigError {
    /// A required variable is not set.
    Missing(&'static str),
    /// A required variable is set to an empty value.
    Empty(&'static str),
    /// A length is not an integer.
    NotAnInteger { var: &'static str, value: EcoString },
    /// A length is zero or negative.
    NotPositive { var: &'static str, value: EcoString },
    /// The action is not one of the supported ones.
    UnknownAction(EcoString),
}

impl std::error::Error for ConfigError {}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Missing(var) => write!(f, "{var} is not set"),
            Self::Empty(var) => write!(f, "{var} is empty"),
            Self::NotAnInteger { var, value } => {
                write!(f, "{var} must be an integer, found `{value}`")
            }
            Self::NotPositive { var, value } => {
                write!(f, "{var} must be a positive integer, found `{value}`")
            }
            Self::UnknownAction(action) => write!(f, "unknown action `{action}`"),
        }
    }
}

impl From<ConfigError> for HintedString {
    fn from(error: ConfigError) -> Self {
        let hinted = HintedString::new(eco_format!("{error}"));
        match error {
            ConfigError::Missing(ACTION_VAR)
            | ConfigError::Empty(ACTION_VAR)
            | ConfigError::UnknownAction(_) => hinted.with_hint(eco_format!(
                "supported actions are {}",
                Unit::ALL.map(Unit::name).join(", ")
            )),
            ConfigError::Missing(var) | ConfigError::Empty(var) => {
                hinted.with_hint(eco_format!("set {var} to the desired number of characters"))
            }
            _ => hinted,
        }
    }
}
