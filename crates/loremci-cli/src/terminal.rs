use std::io::{self, IsTerminal, Write};

use codespan_reporting::term::{self, termcolor};
use loremci::diag::HintedString;
use termcolor::{ColorChoice, ColorSpec, WriteColor};

use crate::ARGS;

/// Returns a handle to the optionally colored terminal output.
pub fn out() -> TermOut {
    TermOut::new()
}

/// A utility that allows users to write colored terminal output.
/// If colors are not supported by the terminal, they are disabled.
pub struct TermOut {
    stream: termcolor::StandardStream,
}

impl TermOut {
    fn new() -> Self {
        let color_choice = match ARGS.color {
            clap::ColorChoice::Auto if io::stderr().is_terminal() => ColorChoice::Auto,
            clap::ColorChoice::Always => ColorChoice::Always,
            _ => ColorChoice::Never,
        };

        Self { stream: termcolor::StandardStream::stderr(color_choice) }
    }
}

impl Write for TermOut {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.lock().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.lock().flush()
    }
}

impl WriteColor for TermOut {
    fn supports_color(&self) -> bool {
        self.stream.supports_color()
    }

    fn set_color(&mut self, spec: &ColorSpec) -> io::Result<()> {
        self.stream.lock().set_color(spec)
    }

    fn reset(&mut self) -> io::Result<()> {
        self.stream.lock().reset()
    }
}

/// How severe a printed diagnostic is.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Severity {
    /// A fatal error.
    Error,
    /// A non-fatal warning.
    Warning,
}

/// Prints an application-level diagnostic with its hints.
pub fn print_diagnostic(
    output: &mut impl WriteColor,
    severity: Severity,
    diagnostic: &HintedString,
) -> io::Result<()> {
    let styles = term::Styles::default();

    let (header, label) = match severity {
        Severity::Error => (&styles.header_error, "error"),
        Severity::Warning => (&styles.header_warning, "warning"),
    };

    output.set_color(header)?;
    write!(output, "{label}")?;
    output.reset()?;
    writeln!(output, ": {}", diagnostic.message())?;

    for hint in diagnostic.hints() {
        output.set_color(&styles.note_bullet)?;
        write!(output, "  = ")?;
        output.reset()?;
        writeln!(output, "hint: {hint}")?;
    }

    Ok(())
}

/// Prints all warnings to the terminal.
pub fn print_warnings(warnings: &[HintedString]) -> io::Result<()> {
    let mut output = out();
    for warning in warnings {
        print_diagnostic(&mut output, Severity::Warning, warning)?;
    }
    Ok(())
}
