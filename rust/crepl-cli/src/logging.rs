//! Tracing subscriber setup.
//!
//! `CREPL_LOG` takes an `EnvFilter` directive string and wins over the
//! command-line verbosity. Logs go to stderr so they never interleave with
//! the generated program's stdout.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "CREPL_LOG";

/// Filter used when `CREPL_LOG` is unset.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "crepl_core=debug,crepl_cli=debug,crepl=debug,warn",
        _ => "trace",
    }
}

pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .init();
}
