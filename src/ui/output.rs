//! Terminal output
//!
//! Progress lines go to stdout with a fixed prefix so they stand out from the
//! output of the tools testpilot runs. Diagnostics go through `tracing` to
//! stderr and are silent unless `--debug` or `TESTPILOT_LOG` turns them on.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Prefix for every progress line
pub const LOG_PREFIX: &str = "testpilot=>";

/// Environment variable holding an `EnvFilter` directive, e.g. `testpilot=trace`
pub const LOG_ENV: &str = "TESTPILOT_LOG";

/// Print a progress line
pub fn log(message: &str) {
  println!("{}", format_log_line(message));
}

fn format_log_line(message: &str) -> String {
  format!("{} {}", LOG_PREFIX, message)
}

/// Install the stderr diagnostics subscriber
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(debug: bool) {
  let default_level = if debug { "debug" } else { "warn" };
  let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

  let subscriber = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_ansi(std::io::stderr().is_terminal())
    .with_writer(std::io::stderr);

  if subscriber.try_init().is_err() {
    tracing::trace!("tracing subscriber already installed");
  }
}
