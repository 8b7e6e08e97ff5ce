//! The generation flow behind both actions.

use std::num::NonZeroUsize;

use ecow::eco_format;
use loremci::diag::{HintedStrResult, HintedString, Warned};
use loremci::{Lorem, MAX_ATTEMPTS, Request, Unit, artifact, generate_exact};
use loremci_kit::{annotate, bootstrap};

use crate::config::Config;
use crate::terminal;

/// Generates a sentence of exactly `chars` characters.
pub fn sentence(config: &Config, chars: NonZeroUsize) -> HintedStrResult<()> {
    run(config, Request::new(Unit::Sentence, chars))
}

/// Generates a paragraph of exactly `chars` characters.
pub fn paragraph(config: &Config, chars: NonZeroUsize) -> HintedStrResult<()> {
    run(config, Request::new(Unit::Paragraph, chars))
}

/// Bootstraps the corpus, generates the text, writes it and annotates the
/// build.
///
/// Nothing is written unless the text has exactly the requested length.
/// Annotation failures are only warned about.
fn run(config: &Config, request: Request) -> HintedStrResult<()> {
    let Warned { output: corpus, warnings } = bootstrap::ensure_ready(&config.bootstrap)?;
    print_warnings(&warnings)?;
    tracing::info!(%corpus, "corpus is ready");

    let mut lorem = Lorem::new(&corpus)?;
    let text = generate_exact(&mut lorem, request, MAX_ATTEMPTS)?;
    let path = artifact::write(&config.output_dir, request.unit.file_name(), &text)?;

    if let Err(err) = annotate::notify(&config.annotate, &path) {
        tracing::warn!(%err, "annotation failed");
        print_warnings(&[err.into()])?;
    }

    Ok(())
}

fn print_warnings(warnings: &[HintedString]) -> HintedStrResult<()> {
    terminal::print_warnings(warnings)
        .map_err(|err| eco_format!("failed to print warnings ({err})").into())
}
