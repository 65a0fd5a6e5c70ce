use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

/// Sets up a stderr `tracing` subscriber. `verbose` raises the log level
/// and switches to a pretty multi-line event format that also shows span
/// open/close events, so a verbose run shows which pipeline stage (lex,
/// parse, eval) was active when something failed.
pub fn setup_stderr_logging(verbose: u8, ansi: bool) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let env_filter = match std::env::var("RUST_LOG").ok() {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::default().add_directive(level.into()),
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    if verbose > 0 {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(ansi)
                    .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
                    .event_format(tracing_subscriber::fmt::format().pretty().with_ansi(ansi))
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(ansi)
                    .event_format(
                        tracing_subscriber::fmt::format()
                            .compact()
                            .with_source_location(false)
                            .with_target(false)
                            .without_time(),
                    )
                    .without_time()
                    .with_file(false)
                    .with_line_number(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    }
}
