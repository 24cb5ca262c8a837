//! Logging setup for the command line tool.
//!
//! Progress text goes to stdout, so log events are written to stderr.
//! `RUST_LOG` overrides the default filter; `DEBUG_LOGGING=1` enables debug
//! output for the pullgraph crates.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEBUG_DIRECTIVE: &str = "info,pullgraph_core=debug,pullgraph_render=debug,pullgraph_cli=debug";

pub fn init() {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(debug_logging)));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .init();

    tracing::debug!(debug_logging, "Logging initialized");
}

fn filter_directive(debug_logging: bool) -> &'static str {
    if debug_logging { DEBUG_DIRECTIVE } else { "info" }
}
