//! Logging setup and the message helpers used at failure points.

use std::fmt::Display;
use tracing_subscriber::{EnvFilter, prelude::*};

const CRATE_TARGET: &str = "un_trace";

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a stderr subscriber. `RUST_LOG` wins when set; otherwise each
/// `-v` raises the crate's level one step above `warn`.
pub fn init_logging(verbosity: u8) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,{}={}", CRATE_TARGET, level_for(verbosity)))
    });

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(env_filter),
        )
        .try_init();
}

/// Record an error event and hand back the text for the error value.
pub fn error_message(message: impl Display) -> String {
    let text = message.to_string();
    tracing::error!("{}", text);
    text
}

pub fn warn(message: impl Display) {
    tracing::warn!("{}", message);
}
