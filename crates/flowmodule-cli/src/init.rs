// Logging setup
//
// Logs go to stderr so a rendered module written to stdout stays clean.

use flowmodule_config::{LogFormat, LoggingConfig};
use std::io::IsTerminal;
use tracing::warn;

pub fn init_tracing(logging: &LoggingConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let (env_filter, invalid_level) = match EnvFilter::try_new(&logging.level) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new("info"), Some(err)),
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    match logging.format {
        LogFormat::Json => {
            registry
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            registry
                .with(
                    fmt::layer()
                        .with_ansi(std::io::stderr().is_terminal())
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }

    if let Some(err) = invalid_level {
        warn!(
            level = %logging.level,
            error = %err,
            "Invalid log level, falling back to info"
        );
    }
}
