use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with optional quiet mode.
///
/// Events are written as JSON lines to stderr so that stdout stays clean for
/// command output. When `quiet` is true, only error-level events are
/// emitted; otherwise info-level and above (default). `RUST_LOG` directives
/// are honored on top of that.
pub fn init_logging(quiet: bool) {
    let directive = if quiet { "inisect=error" } else { "inisect=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(
            EnvFilter::from_default_env()
                .add_directive(directive.parse().expect("Invalid log directive")),
        )
        .init();
}
