// Copyright 2025 Shellbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared foundation for shellbench.
//!
//! This crate holds the pieces every other shellbench crate leans on:
//!
//! - [`error`] - The crate-wide [`Error`] type and [`Result`] alias
//! - [`config`] - Layered configuration loading ([`AppConfig`])
//! - [`telemetry`] - `tracing` subscriber initialisation

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod telemetry;

pub use crate::config::AppConfig;
pub use crate::error::{Error, Result};
