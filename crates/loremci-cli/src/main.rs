use std::process::ExitCode;

use ecow::eco_format;
use loremci::diag::HintedStrResult;

use loremci_cli::config::{Action, Config};
use loremci_cli::{ARGS, EXIT, generate, print_error, set_failed};

/// Entry point.
fn main() -> ExitCode {
    loremci_cli::tracing::setup_tracing(&ARGS);

    let res = dispatch();

    if let Err(msg) = res {
        set_failed();
        print_error(&msg).expect("failed to print error");
    }

    EXIT.with(|cell| cell.get())
}

/// Execute the requested action.
fn dispatch() -> HintedStrResult<()> {
    let workdir = std::env::current_dir()
        .map_err(|err| eco_format!("failed to determine the working directory ({err})"))?;
    let config = Config::new(&ARGS, &workdir)?;

    match config.action {
        Action::Sentence(chars) => generate::sentence(&config, chars)?,
        Action::Paragraph(chars) => generate::paragraph(&config, chars)?,
    }

    Ok(())
}
