//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::Result};

/// Initialize the global tracing subscriber
///
/// The filter is seeded from `service.log_level`; `RUST_LOG`-style directives
/// are accepted there as well. Output is JSON unless `service.log_format` is
/// `"pretty"`.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = build_filter(&config.service.log_level);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = if config.service.log_format.eq_ignore_ascii_case("pretty") {
        builder.pretty().try_init()
    } else {
        builder.json().try_init()
    };

    if let Err(e) = installed {
        // A subscriber may already be installed (tests, embedding)
        tracing::debug!("Tracing subscriber already set: {}", e);
    }

    tracing::info!(
        service = %config.service.name,
        environment = %config.service.environment,
        "Tracing initialized"
    );

    Ok(())
}

fn build_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"))
}
