use std::path::PathBuf;

use clap::{ArgAction, ColorChoice, Parser};

/// Generates lorem ipsum text of an exact length for a CI build step.
///
/// Every option can also be given through the environment variable named in
/// its description. The generated text is written to
/// `<output-dir>/result.txt` for sentences and `<output-dir>/result2.txt` for
/// paragraphs.
#[derive(Debug, Clone, Parser)]
#[clap(name = "loremci", version, author)]
pub struct CliArguments {
    /// What to generate: SENTENCE or PARAGRAPH (case-insensitive)
    #[clap(long, env = "LOREMIPSUM_ACTION", value_name = "ACTION")]
    pub action: Option<String>,

    /// The exact number of characters of a generated sentence
    #[clap(long, env = "SENTENCE_MAX_CHAR", value_name = "CHARS")]
    pub sentence_max_char: Option<String>,

    /// The exact number of characters of a generated paragraph
    #[clap(long, env = "PARAGRAPH_MAX_CHAR", value_name = "CHARS")]
    pub paragraph_max_char: Option<String>,

    /// Whether to pass the generated text to the annotation command ("true"
    /// enables it)
    #[clap(long, env = "ANNOTATE", value_name = "BOOL", default_value = "false")]
    pub annotate: String,

    /// The command the generated text is appended to when annotating
    #[clap(
        long,
        env = "ANNOTATE_COMMAND",
        value_name = "COMMAND",
        default_value = "buildkite-agent annotate"
    )]
    pub annotate_command: String,

    /// The directory to write results to, relative to the working directory
    #[clap(
        long,
        env = "LOREMIPSUM_OUTPUT_DIR",
        value_name = "DIR",
        default_value = "assets/artifacts"
    )]
    pub output_dir: PathBuf,

    /// The source root to install the corpus package from [default:
    /// discovered from the working directory]
    #[clap(long, env = "LOREMIPSUM_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// The repository name, marking its root during discovery
    #[clap(
        long,
        env = "LOREMIPSUM_REPO_NAME",
        value_name = "NAME",
        default_value = "buildkite-py-lorem-demo"
    )]
    pub repo_name: String,

    /// Whether to reinstall the corpus package from local source ("true"
    /// enables it)
    #[clap(long, env = "LOREMIPSUM_REINSTALL", value_name = "BOOL", default_value = "false")]
    pub reinstall: String,

    /// Where corpus packages are installed to [default: the user's cache
    /// directory]
    #[clap(long, env = "LOREMIPSUM_INSTALL_DIR", value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// The Buildkite plugin running the step; DOCKER marks a containerized
    /// build with the repository mounted at /<repo-name>
    #[clap(long, env = "BUILDKITE_PLUGIN_NAME", value_name = "PLUGIN")]
    pub plugin_name: Option<String>,

    /// Whether to use color in diagnostics
    #[clap(long, value_name = "WHEN", default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Sets the level of logging verbosity:
    /// -v = warning & error, -vv = info, -vvv = debug, -vvvv = trace
    #[clap(short, long, action = ArgAction::Count)]
    pub verbosity: u8,
}
