use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_FILTER: &str = "xstat=info,warn";

/// Pick the filter directive: `RUST_LOG`, then config, then default
pub fn filter_directive(env: Option<String>, configured: Option<&str>) -> String {
    env.filter(|value| !value.is_empty())
        .or_else(|| configured.map(str::to_owned))
        .unwrap_or_else(|| DEFAULT_FILTER.into())
}

/// Install the global subscriber; diagnostics go to stderr
pub fn init(configured: Option<&str>) {
    let directive = filter_directive(std::env::var("RUST_LOG").ok(), configured);
    tracing_subscriber::registry()
        .with(EnvFilter::new(directive))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
