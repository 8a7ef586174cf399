// Copyright 2025 Shellbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tracing subscriber setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LogFormat};
use crate::error::{Error, Result};

/// Build the event filter: `RUST_LOG` wins, otherwise the configured level.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global tracing subscriber described by `config`.
///
/// Fails if a global subscriber is already installed.
pub fn init(config: &AppConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(&config.log_level));

    let installed = match config.log_format {
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact().with_target(false))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    installed.map_err(|e| Error::config(format!("tracing already initialised: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_uses_default_level() {
        if std::env::var_os("RUST_LOG").is_none() {
            let filter = env_filter("warn");
            assert_eq!(filter.to_string(), "warn");
        }
    }

    #[test]
    fn test_second_init_fails() {
        let config = AppConfig::default();
        let _ = init(&config);
        assert!(init(&config).is_err());
    }
}
