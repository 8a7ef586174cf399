// Copyright 2025 Shellbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Layered configuration for shellbench.
//!
//! Values are resolved in this order, later sources winning:
//!
//! 1. Built-in defaults (see [`ConfigKey::default_value`])
//! 2. An optional TOML file (`shellbench.toml` unless a path is given)
//! 3. Environment variables prefixed with `SHELLBENCH__`, using `__` as the
//!    section separator, e.g. `SHELLBENCH__RUNNER__INTER_CASE_PAUSE_MS=250`
//!
//! A `.env` file in the working directory is loaded first when present.
//!
//! # Example
//!
//! ```no_run
//! use shellbench_core::config::AppConfig;
//!
//! let config = AppConfig::load(None)?;
//! assert!(config.animation.steps > 0);
//! # Ok::<(), shellbench_core::Error>(())
//! ```

use ::config::{Config, Environment, File, Value};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default configuration file name, resolved relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "shellbench.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SHELLBENCH";

/// Known configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// Pause after each case of a batch run
    InterCasePauseMs,
    /// Total animation duration
    AnimationDurationMs,
    /// Number of animation ticks
    AnimationSteps,
    /// Report output directory
    OutputDir,
    /// Tracing filter directive
    LogLevel,
    /// Tracing output format
    LogFormat,
}

impl ConfigKey {
    /// All keys, in declaration order.
    pub const ALL: [ConfigKey; 6] = [
        ConfigKey::InterCasePauseMs,
        ConfigKey::AnimationDurationMs,
        ConfigKey::AnimationSteps,
        ConfigKey::OutputDir,
        ConfigKey::LogLevel,
        ConfigKey::LogFormat,
    ];

    /// Dotted path of this key inside the configuration tree.
    pub fn path(&self) -> &'static str {
        match self {
            Self::InterCasePauseMs => "runner.inter_case_pause_ms",
            Self::AnimationDurationMs => "animation.duration_ms",
            Self::AnimationSteps => "animation.steps",
            Self::OutputDir => "output.dir",
            Self::LogLevel => "log_level",
            Self::LogFormat => "log_format",
        }
    }

    /// Built-in default for this key.
    pub fn default_value(&self) -> Value {
        match self {
            Self::InterCasePauseMs => Value::from(500_i64),
            Self::AnimationDurationMs => Value::from(2000_i64),
            Self::AnimationSteps => Value::from(60_i64),
            Self::OutputDir => Value::from("benchmarks/output"),
            Self::LogLevel => Value::from("info"),
            Self::LogFormat => Value::from("compact"),
        }
    }
}

/// Output format for tracing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Compact,
    /// Newline-delimited JSON.
    Json,
}

/// Benchmark runner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Pause inserted after every case of a batch, in milliseconds.
    pub inter_case_pause_ms: u64,
}

impl RunnerConfig {
    /// The inter-case pause as a [`Duration`].
    pub fn inter_case_pause(&self) -> Duration {
        Duration::from_millis(self.inter_case_pause_ms)
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            inter_case_pause_ms: 500,
        }
    }
}

/// Counter animation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Wall-clock length of one animation run, in milliseconds.
    pub duration_ms: u64,
    /// Number of ticks in one animation run.
    pub steps: u32,
}

impl AnimationConfig {
    /// The animation duration as a [`Duration`].
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            steps: 60,
        }
    }
}

/// Report output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving JSON and markdown reports.
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "benchmarks/output".to_string(),
        }
    }
}

/// Fully resolved shellbench configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Runner settings.
    pub runner: RunnerConfig,
    /// Animation settings.
    pub animation: AnimationConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Tracing filter directive (`RUST_LOG` syntax).
    pub log_level: String,
    /// Tracing output format.
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            runner: RunnerConfig::default(),
            animation: AnimationConfig::default(),
            output: OutputConfig::default(),
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment.
    ///
    /// When `path` is `None` the default file is read if it exists. An
    /// explicitly given path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // A missing .env is the normal case.
        let _ = dotenvy::dotenv();

        let mut builder = Config::builder();
        for key in ConfigKey::ALL {
            builder = builder.set_default(key.path(), key.default_value())?;
        }

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let config: AppConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.animation.steps == 0 {
            return Err(Error::config("animation.steps must be greater than zero"));
        }
        if self.animation.duration_ms == 0 {
            return Err(Error::config(
                "animation.duration_ms must be greater than zero",
            ));
        }
        if self.output.dir.trim().is_empty() {
            return Err(Error::config("output.dir must not be empty"));
        }
        Ok(())
    }
}
