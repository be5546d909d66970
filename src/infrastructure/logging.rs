use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log to stderr. Only warnings are shown unless `verbose` is set;
/// `RUST_LOG` overrides both.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose).into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter)
        .init();
}

fn default_level(verbose: bool) -> LevelFilter {
    if verbose { LevelFilter::INFO } else { LevelFilter::WARN }
}
