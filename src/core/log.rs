use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

pub fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = log_filter(verbose, rust_log.as_deref());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .init();
}

/// Silent by default. `RUST_LOG` directives apply as given and `--verbose`
/// adds debug output for this crate on top of them.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let mut directives = match rust_log.map(str::trim) {
        Some(env) if !env.is_empty() => env.to_string(),
        _ => "off".to_string(),
    };
    if verbose {
        directives.push_str(",goldrate=debug");
    }
    EnvFilter::builder().parse_lossy(directives)
}
