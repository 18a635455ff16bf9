// Copyright (C) 2026 Clipsync Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Logging initialization and setup.
//!
//! This module provides functions to initialize the tracing system with
//! different configurations and output formats.

use crate::config::{LogConfig, LogError, LogFormat};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Initialize tracing with the specified format and optional log level.
///
/// Convenience wrapper over [`init_tracing_with_config`] using the default
/// configuration except for format and level.
///
/// # Arguments
///
/// * `format` - The output format for logs
/// * `level` - Optional log level (e.g., "info", "debug"). If None, uses RUST_LOG
pub fn init_tracing(format: LogFormat, level: Option<&str>) -> Result<(), LogError> {
    let mut config = LogConfig::new().with_format(format);
    if let Some(level) = level {
        config = config.with_level(level);
    }
    init_tracing_with_config(config)
}

/// Initialize tracing with a detailed configuration.
///
/// Registers a global subscriber; calling this twice returns an error from
/// the underlying registry, which callers may ignore.
pub fn init_tracing_with_config(config: LogConfig) -> Result<(), LogError> {
    let env_filter = build_env_filter(&config)?;
    let registry = Registry::default().with(env_filter);

    match config.format {
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(config.use_color)
                .pretty();
            if config.use_timestamps {
                registry.with(layer.with_timer(fmt::time::SystemTime)).init();
            } else {
                registry.with(layer.without_time()).init();
            }
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(config.use_color)
                .compact();
            if config.use_timestamps {
                registry.with(layer.with_timer(fmt::time::SystemTime)).init();
            } else {
                registry.with(layer.without_time()).init();
            }
        }
        LogFormat::Json => {
            let layer = fmt::layer().with_writer(std::io::stderr).json().with_target(true);
            if config.use_timestamps {
                registry.with(layer.with_timer(fmt::time::SystemTime)).init();
            } else {
                registry.with(layer.without_time()).init();
            }
        }
    }

    Ok(())
}

/// Build an environment filter for the given configuration
fn build_env_filter(config: &LogConfig) -> Result<EnvFilter, LogError> {
    let level = config.effective_level();

    EnvFilter::try_new(&level)
        .map_err(|e| LogError::InvalidFilter(format!("Failed to parse log filter '{}': {}", level, e)))
}
