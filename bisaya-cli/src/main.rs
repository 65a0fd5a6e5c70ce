use std::io::{stdin, stdout};
use std::process::exit;

use anyhow::Context;
use clap::Parser;

use bisaya::error::DiagnosticCode;

mod args;
mod log;

use args::{BisayaArgs, Colors};

fn main() -> anyhow::Result<()> {
    let cli = BisayaArgs::parse();

    let ansi = match cli.colors {
        Colors::Auto => atty::is(atty::Stream::Stderr),
        Colors::Always => true,
        Colors::Never => false,
    };
    log::setup_stderr_logging(cli.verbose, ansi);

    let span = tracing::info_span!("bisaya", source = %cli.source);
    let _enter = span.enter();

    let source = std::fs::read_to_string(&cli.source)
        .with_context(|| format!("failed to read '{}'", cli.source))?;

    let mut input = stdin().lock();
    let mut output = stdout().lock();

    match bisaya::run(&source, &mut input, &mut output) {
        Ok(()) => {
            exit(0);
        }
        Err(error) => {
            tracing::error!(code = error.code(), line = error.line(), "run failed");
            eprintln!("{}: [{}] {}", error.line(), error.code(), error);
            exit(1);
        }
    }
}
