use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// `-q` keeps errors only; each `-v` opens one more level above WARN.
pub fn level_filter(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::INFO,
        (false, 2) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber: compact records on stderr and, when
/// `log_file` is given, a plain-text copy that also records how long each
/// assessment span took.
pub fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let file_layer = log_file
        .map(|path| -> Result<_> {
            let file = File::create(path).map_err(CliError::Io)?;
            Ok(fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_span_events(FmtSpan::CLOSE))
        })
        .transpose()?;

    tracing_subscriber::registry()
        .with(level_filter(verbose, quiet))
        .with(console)
        .with(file_layer)
        .init();
    Ok(())
}
