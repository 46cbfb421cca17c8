//! Logging configuration using tracing_subscriber.
//!
//! Logs go to stderr: stdout is reserved for the final solve response.

use std::{io::IsTerminal as _, sync::Once};

use tracing_subscriber::{EnvFilter, filter::LevelFilter};

static LOG_ENV_VAR: &str = "RESTORECTL_LOG";

/// Initializes a tracing subscriber for logging.
pub fn init() {
    // Since we also use this function to enable logging in tests, wrap it in
    // `Once` to prevent multiple initializations.
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let env_filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .with_env_var(LOG_ENV_VAR)
            .from_env_lossy();

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .init();
    });
}
