// ABOUTME: HTTP middleware for CORS and request tracing
// ABOUTME: Provides request id generation and span creation for structured logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

/// CORS configuration
pub mod cors;
/// Request ids and HTTP tracing spans
pub mod tracing;

pub use cors::setup_cors;
pub use tracing::{trace_layer, GenerateRequestId, RequestSpan, REQUEST_ID_HEADER};
