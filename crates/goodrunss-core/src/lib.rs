// ABOUTME: Core types and constants for the GoodRunss backend
// ABOUTME: Foundation crate with error handling, constants, and geographic helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

#![deny(unsafe_code)]

//! # GoodRunss Core
//!
//! Foundation crate shared by the server and the vendor clients. It changes
//! rarely, which keeps incremental builds of the server crate fast.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Application-wide constants organized by domain
//! - **geo**: Haversine distance helpers

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Great-circle distance helpers
pub mod geo;
