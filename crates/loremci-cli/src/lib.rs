pub mod args;
pub mod config;
pub mod generate;
pub mod terminal;
pub mod tracing;

use std::cell::Cell;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use loremci::diag::HintedString;
use once_cell::sync::Lazy;

use crate::args::CliArguments;
use crate::terminal::Severity;

/// Ensure a failure exit code.
pub fn set_failed() {
    EXIT.with(|cell| cell.set(ExitCode::FAILURE));
}

thread_local! {
    /// The CLI's exit code.
    pub static EXIT: Cell<ExitCode> = const { Cell::new(ExitCode::SUCCESS) };
}

/// The parsed commandline arguments.
pub static ARGS: Lazy<CliArguments> = Lazy::new(CliArguments::parse);

/// Print an application-level error.
pub fn print_error(error: &HintedString) -> io::Result<()> {
    terminal::print_diagnostic(&mut terminal::out(), Severity::Error, error)
}
