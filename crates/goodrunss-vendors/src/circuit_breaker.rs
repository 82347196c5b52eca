// ABOUTME: Circuit breaker for outbound vendor API calls
// ABOUTME: Fails fast once a vendor keeps failing and tries again after a timeout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use std::future::Future;
use std::sync::atomic::{AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::errors::VendorError;

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation - requests pass through
    Closed,
    /// Circuit is open - requests fail immediately
    Open,
    /// Testing recovery - allowing one request through
    HalfOpen,
}

impl CircuitState {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Closed,
            1 => Self::Open,
            _ => Self::HalfOpen,
        }
    }

    const fn to_u8(self) -> u8 {
        match self {
            Self::Closed => 0,
            Self::Open => 1,
            Self::HalfOpen => 2,
        }
    }
}

/// Configuration for circuit breaker behavior
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Number of consecutive failures before opening circuit
    pub failure_threshold: u32,
    /// Duration to wait before attempting recovery (half-open state)
    pub recovery_timeout: Duration,
    /// Successes needed in half-open state to close the circuit
    pub success_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(30),
            success_threshold: 2,
        }
    }
}

impl CircuitBreakerConfig {
    /// Create a new circuit breaker configuration
    #[must_use]
    pub const fn new(
        failure_threshold: u32,
        recovery_timeout: Duration,
        success_threshold: u32,
    ) -> Self {
        Self {
            failure_threshold,
            recovery_timeout,
            success_threshold,
        }
    }
}

/// Thread-safe circuit breaker for vendor API calls
///
/// - **Closed**: requests pass through and consecutive failures are counted.
/// - **Open**: after the threshold is reached every call fails immediately.
/// - **Half-Open**: once the recovery timeout elapses trial requests are let
///   through; enough successes close the circuit, a failure re-opens it.
///
/// All state lives in atomics so a single breaker can be shared by every
/// request handler without locking.
#[derive(Debug)]
pub struct CircuitBreaker {
    vendor: &'static str,
    state: AtomicU8,
    failure_count: AtomicU32,
    success_count: AtomicU32,
    /// Milliseconds since `start_instant` at which the circuit last opened
    last_failure_time: AtomicU64,
    config: CircuitBreakerConfig,
    start_instant: Instant,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with default configuration
    #[must_use]
    pub fn new(vendor: &'static str) -> Self {
        Self::with_config(vendor, CircuitBreakerConfig::default())
    }

    /// Create a new circuit breaker with custom configuration
    #[must_use]
    pub fn with_config(vendor: &'static str, config: CircuitBreakerConfig) -> Self {
        Self {
            vendor,
            state: AtomicU8::new(CircuitState::Closed.to_u8()),
            failure_count: AtomicU32::new(0),
            success_count: AtomicU32::new(0),
            last_failure_time: AtomicU64::new(0),
            config,
            start_instant: Instant::now(),
        }
    }

    /// Get current circuit state
    #[must_use]
    pub fn state(&self) -> CircuitState {
        CircuitState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Get current failure count
    #[must_use]
    pub fn failure_count(&self) -> u32 {
        self.failure_count.load(Ordering::SeqCst)
    }

    /// Check if circuit allows requests
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        match self.state() {
            CircuitState::Closed => true,
            CircuitState::Open => self.should_attempt_recovery(),
            // Trial requests keep flowing until the success threshold closes the circuit
            CircuitState::HalfOpen => true,
        }
    }

    fn should_attempt_recovery(&self) -> bool {
        let last_failure = self.last_failure_time.load(Ordering::SeqCst);
        let recovery_ms = self.config.recovery_timeout.as_millis() as u64;

        if self.elapsed_millis().saturating_sub(last_failure) >= recovery_ms
            && self
                .state
                .compare_exchange(
                    CircuitState::Open.to_u8(),
                    CircuitState::HalfOpen.to_u8(),
                    Ordering::SeqCst,
                    Ordering::SeqCst,
                )
                .is_ok()
        {
            info!(
                vendor = self.vendor,
                "Circuit breaker transitioning to half-open state for recovery test"
            );
            return true;
        }
        false
    }

    fn elapsed_millis(&self) -> u64 {
        self.start_instant.elapsed().as_millis() as u64
    }

    /// Record a successful operation
    pub fn record_success(&self) {
        match self.state() {
            CircuitState::Closed => {
                self.failure_count.store(0, Ordering::SeqCst);
            }
            CircuitState::HalfOpen => {
                let count = self.success_count.fetch_add(1, Ordering::SeqCst) + 1;
                if count >= self.config.success_threshold {
                    self.state
                        .store(CircuitState::Closed.to_u8(), Ordering::SeqCst);
                    self.failure_count.store(0, Ordering::SeqCst);
                    self.success_count.store(0, Ordering::SeqCst);
                    info!(vendor = self.vendor, "Circuit breaker closed - vendor recovered");
                }
            }
            CircuitState::Open => {}
        }
    }

    /// Record a failed operation
    pub fn record_failure(&self) {
        match self.state() {
            CircuitState::Closed => {
                let count = self.failure_count.fetch_add(1, Ordering::SeqCst) + 1;
                if count >= self.config.failure_threshold {
                    self.state
                        .store(CircuitState::Open.to_u8(), Ordering::SeqCst);
                    self.last_failure_time
                        .store(self.elapsed_millis(), Ordering::SeqCst);
                    warn!(
                        vendor = self.vendor,
                        failures = count,
                        threshold = self.config.failure_threshold,
                        recovery_timeout_secs = self.config.recovery_timeout.as_secs(),
                        "Circuit breaker opened - vendor failing"
                    );
                }
            }
            CircuitState::HalfOpen => {
                self.state
                    .store(CircuitState::Open.to_u8(), Ordering::SeqCst);
                self.last_failure_time
                    .store(self.elapsed_millis(), Ordering::SeqCst);
                self.success_count.store(0, Ordering::SeqCst);
                warn!(
                    vendor = self.vendor,
                    "Circuit breaker re-opened - recovery test failed"
                );
            }
            CircuitState::Open => {
                self.last_failure_time
                    .store(self.elapsed_millis(), Ordering::SeqCst);
            }
        }
    }

    /// Execute an async vendor call with circuit breaker protection
    ///
    /// # Errors
    ///
    /// Returns `VendorError::CircuitBreakerOpen` if the circuit is open and the
    /// recovery timeout hasn't elapsed. Otherwise returns the result of the call.
    pub async fn call<F, T>(&self, operation: F) -> Result<T, VendorError>
    where
        F: Future<Output = Result<T, VendorError>>,
    {
        if !self.is_allowed() {
            return Err(VendorError::CircuitBreakerOpen {
                vendor: self.vendor,
                retry_after_secs: self.time_until_recovery(),
            });
        }

        match operation.await {
            Ok(result) => {
                self.record_success();
                Ok(result)
            }
            Err(e) => {
                if e.is_retryable() {
                    self.record_failure();
                } else if self.state() == CircuitState::HalfOpen {
                    // The vendor answered, so it is reachable again
                    self.record_success();
                }
                Err(e)
            }
        }
    }

    fn time_until_recovery(&self) -> u64 {
        let last_failure = self.last_failure_time.load(Ordering::SeqCst);
        let recovery_ms = self.config.recovery_timeout.as_millis() as u64;
        let time_since_failure = self.elapsed_millis().saturating_sub(last_failure);

        recovery_ms
            .saturating_sub(time_since_failure)
            .saturating_add(999)
            / 1000
    }

    /// Force reset the circuit breaker to closed state
    pub fn reset(&self) {
        self.state
            .store(CircuitState::Closed.to_u8(), Ordering::SeqCst);
        self.failure_count.store(0, Ordering::SeqCst);
        self.success_count.store(0, Ordering::SeqCst);
        info!(vendor = self.vendor, "Circuit breaker manually reset to closed state");
    }
}
