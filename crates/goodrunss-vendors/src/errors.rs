// ABOUTME: Error type for vendor API calls with retry classification
// ABOUTME: Converts vendor failures into AppError codes with the right HTTP status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use goodrunss_core::errors::{AppError, ErrorCode};
use thiserror::Error;

/// Failures returned by vendor clients
#[derive(Debug, Error)]
pub enum VendorError {
    /// Credentials for the vendor are not configured
    #[error("{vendor} not configured")]
    NotConfigured {
        /// Vendor display name
        vendor: &'static str,
    },

    /// Vendor rejected the token or API key (HTTP 401/403)
    #[error("{vendor} authentication failed: {message}")]
    AuthFailed {
        /// Vendor display name
        vendor: &'static str,
        /// Vendor-supplied error body
        message: String,
    },

    /// Vendor refused the request (other 4xx or a logical error status)
    #[error("{vendor} rejected the request ({status}): {message}")]
    Rejected {
        /// Vendor display name
        vendor: &'static str,
        /// HTTP status returned by the vendor
        status: u16,
        /// Vendor-supplied error body
        message: String,
    },

    /// Vendor answered 200 but reported a failure status in the body
    #[error("{vendor} request failed with status {status}: {message}")]
    ApiStatus {
        /// Vendor display name
        vendor: &'static str,
        /// Vendor status string (for example `ZERO_RESULTS`)
        status: String,
        /// Vendor-supplied error message
        message: String,
    },

    /// Vendor throttled the request (HTTP 429)
    #[error("{vendor} rate limit exceeded")]
    RateLimited {
        /// Vendor display name
        vendor: &'static str,
    },

    /// Vendor returned a 5xx status
    #[error("{vendor} server error ({status}): {message}")]
    ServerError {
        /// Vendor display name
        vendor: &'static str,
        /// HTTP status returned by the vendor
        status: u16,
        /// Vendor-supplied error body
        message: String,
    },

    /// Transport failure before a response was received
    #[error("{vendor} request failed: {source}")]
    Network {
        /// Vendor display name
        vendor: &'static str,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// Response body did not match the expected shape
    #[error("{vendor} returned an unexpected response: {message}")]
    InvalidResponse {
        /// Vendor display name
        vendor: &'static str,
        /// Decoding failure description
        message: String,
    },

    /// Calls are short-circuited after repeated failures
    #[error("{vendor} temporarily unavailable, retry in {retry_after_secs}s")]
    CircuitBreakerOpen {
        /// Vendor display name
        vendor: &'static str,
        /// Seconds until a recovery attempt is allowed
        retry_after_secs: u64,
    },
}

impl VendorError {
    /// Classify a non-success HTTP status into the matching variant
    #[must_use]
    pub fn from_status(vendor: &'static str, status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::AuthFailed {
                vendor,
                message: body,
            },
            429 => Self::RateLimited { vendor },
            500..=599 => Self::ServerError {
                vendor,
                status,
                message: body,
            },
            _ => Self::Rejected {
                vendor,
                status,
                message: body,
            },
        }
    }

    /// Wrap a transport error
    #[must_use]
    pub const fn network(vendor: &'static str, source: reqwest::Error) -> Self {
        Self::Network { vendor, source }
    }

    /// Wrap a decoding failure
    pub fn invalid_response(vendor: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            vendor,
            message: message.into(),
        }
    }

    /// Whether the failure indicates the vendor itself is unhealthy
    ///
    /// Only these failures count towards opening the circuit breaker; a bad
    /// token or payload says nothing about vendor availability.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ServerError { .. } | Self::Network { .. } | Self::RateLimited { .. }
        )
    }

    /// Error code this failure maps to
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotConfigured { .. } => ErrorCode::ConfigMissing,
            Self::AuthFailed { .. } => ErrorCode::ExternalAuthFailed,
            Self::Rejected { .. } | Self::ApiStatus { .. } => ErrorCode::ExternalRequestRejected,
            Self::RateLimited { .. } => ErrorCode::ExternalRateLimited,
            Self::ServerError { .. } | Self::Network { .. } | Self::InvalidResponse { .. } => {
                ErrorCode::ExternalServiceError
            }
            Self::CircuitBreakerOpen { .. } => ErrorCode::ExternalServiceUnavailable,
        }
    }
}

impl From<VendorError> for AppError {
    fn from(error: VendorError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let app_error = Self::new(code, message);
        if let VendorError::CircuitBreakerOpen {
            retry_after_secs, ..
        } = error
        {
            return app_error.with_details(serde_json::json!({ "retry_after_secs": retry_after_secs }));
        }
        app_error.with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            VendorError::from_status("Zoom", 401, String::new()),
            VendorError::AuthFailed { .. }
        ));
        assert!(matches!(
            VendorError::from_status("Zoom", 429, String::new()),
            VendorError::RateLimited { .. }
        ));
        assert!(matches!(
            VendorError::from_status("Zoom", 503, String::new()),
            VendorError::ServerError { status: 503, .. }
        ));
        assert!(matches!(
            VendorError::from_status("Zoom", 422, String::new()),
            VendorError::Rejected { status: 422, .. }
        ));
    }

    #[test]
    fn test_only_vendor_faults_are_retryable() {
        assert!(VendorError::from_status("Stripe", 500, String::new()).is_retryable());
        assert!(!VendorError::from_status("Stripe", 400, String::new()).is_retryable());
        assert!(!VendorError::NotConfigured { vendor: "Stripe" }.is_retryable());
    }

    #[test]
    fn test_conversion_to_app_error() {
        let error: AppError = VendorError::NotConfigured { vendor: "Twilio" }.into();
        assert_eq!(error.code, ErrorCode::ConfigMissing);
        assert_eq!(error.message, "Twilio not configured");
        assert_eq!(error.http_status(), 500);

        let error: AppError = VendorError::from_status("Zoom", 401, "bad token".to_owned()).into();
        assert_eq!(error.http_status(), 400);

        let error: AppError = VendorError::CircuitBreakerOpen {
            vendor: "Stripe",
            retry_after_secs: 12,
        }
        .into();
        assert_eq!(error.http_status(), 503);
        assert_eq!(error.context.details["retry_after_secs"], 12);
    }
}
