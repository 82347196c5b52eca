// ABOUTME: GoodRunss API server binary
// ABOUTME: Loads configuration, prepares the database and vendor clients, then serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

#![recursion_limit = "256"]

//! # GoodRunss Server Binary
//!
//! Starts the marketplace and integrations API on `HOST:HTTP_PORT`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use goodrunss_server::{
    config::ServerConfig, database::Database, logging, resources::ServerResources, server,
};
use goodrunss_vendors::http_client;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "goodrunss-server")]
#[command(about = "GoodRunss backend - marketplace and vendor integrations API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Skip schema migrations on startup
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.http_port {
        config.http_port = port;
    }
    if args.no_migrate {
        config.database.auto_migrate = false;
    }

    logging::init_from_env()?;
    info!("Starting GoodRunss API server");
    info!("{}", config.summary());

    http_client::initialize_shared_client(
        config.http_client.timeout_secs,
        config.http_client.connect_timeout_secs,
    );

    let database = Database::connect(&config.database.url).await?;
    if config.database.auto_migrate {
        database.migrate().await?;
    } else {
        info!("Skipping database migrations (AUTO_MIGRATE=false)");
    }

    let addr = SocketAddr::new(config.host, config.http_port);
    let resources = Arc::new(ServerResources::new(database, config));

    if let Err(e) = server::serve(resources, addr).await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    Ok(())
}
