//! Boot — logging init and config load.

use tracing::{info, error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::DecoderConfig;

/// Initialise the tracing / logging subsystem.
///
/// Logs go to stderr; stdout carries only events.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "decoder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load and validate configuration.
pub fn boot() -> Result<DecoderConfig, Box<dyn std::error::Error>> {
    info!("Starting decoder v{}", env!("CARGO_PKG_VERSION"));

    let config = DecoderConfig::load()?;
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    match &config.json {
        Some(json) => {
            info!(
                "JSON decoding: message_key={:?}, keys_under_root={}, overwrite_keys={}, add_error_key={}",
                json.message_key, json.keys_under_root, json.overwrite_keys, json.add_error_key
            );
            if json.overwrite_keys && !json.keys_under_root {
                warn!("json.overwrite_keys has no effect unless json.keys_under_root is set");
            }
        }
        None => info!("JSON decoding disabled, records pass through as plain text"),
    }
    info!("Max record size: {} bytes", config.max_bytes);

    Ok(config)
}
