//! Diagnostic logging setup.
//!
//! Logs go to stderr so they never interleave with the game screen on stdout.
//! Set `DEBUG_LOGGING=1` for debug output from this crate.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub fn init() {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let filter_directive = if debug_logging {
        "warn,hangman=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::new(filter_directive);

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .try_init();

    tracing::debug!(debug_logging, "logging initialized");
}
