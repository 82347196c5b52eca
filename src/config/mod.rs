// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports environment-driven server config and vendor credential config
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

//! Configuration module for the GoodRunss server
//!
//! - **Environment**: Server configuration from environment variables
//! - **Integrations**: Vendor credentials and status reporting
//! - **Types**: Shared enums for log level and deployment environment

/// Environment and server configuration
pub mod environment;
/// Vendor credentials and integration status
pub mod integrations;
/// Core configuration type definitions
pub mod types;

pub use environment::ServerConfig;
pub use integrations::{IntegrationsConfig, VendorStatus};
pub use types::{Environment, LogLevel};
