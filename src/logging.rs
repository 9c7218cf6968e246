use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber. Logs go to stderr so table and
/// JSON output on stdout stay clean. `RUST_LOG` overrides the level.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "prompt_archive=debug"
    } else {
        "prompt_archive=warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into()))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
