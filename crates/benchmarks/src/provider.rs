//! Computation provider seam.
//!
//! The runner times calls to a [`ComputationProvider`]. Any error it
//! returns is treated as a recoverable per-case failure.

use async_trait::async_trait;
use thiserror::Error;

/// Errors a provider may report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The computation itself failed.
    #[error("Computation failed: {0}")]
    Computation(String),

    /// The provider could not be reached or its worker died.
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

/// External component performing the timed numeric work.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComputationProvider: Send + Sync {
    /// Run `workload_size` iterations and return the computed value.
    async fn compute(&self, workload_size: u64) -> Result<u64, ProviderError>;
}

/// CPU-bound arithmetic loop executed on the blocking thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeProvider;

impl NativeProvider {
    /// Create a new NativeProvider.
    pub fn new() -> Self {
        Self
    }

    /// Wrapping sum of `i * i mod 1_000_000` for `i` in `0..iterations`.
    pub fn heavy_computation(iterations: u64) -> u64 {
        (0..iterations).fold(0u64, |acc, i| {
            acc.wrapping_add(i.wrapping_mul(i) % 1_000_000)
        })
    }
}

#[async_trait]
impl ComputationProvider for NativeProvider {
    async fn compute(&self, workload_size: u64) -> Result<u64, ProviderError> {
        tokio::task::spawn_blocking(move || Self::heavy_computation(workload_size))
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))
    }
}
