use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Without `debug` the level is pinned to `info`
/// so a stray `RUST_LOG` cannot flood the terminal; with it, `RUST_LOG` wins
/// and falls back to `debug`.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    // A subscriber may already be installed (tests, embedding apps).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
