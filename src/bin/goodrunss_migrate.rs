// ABOUTME: One-shot database migration binary
// ABOUTME: Creates every GoodRunss table and seed row, then exits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use anyhow::Result;
use clap::Parser;
use goodrunss_server::{config::ServerConfig, database::Database, logging};
use tracing::info;

#[derive(Parser)]
#[command(name = "goodrunss-migrate")]
#[command(about = "Create or upgrade the GoodRunss database schema")]
pub struct Args {
    /// Database URL, overriding `DATABASE_URL`
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServerConfig::from_env()?;
    logging::init_from_env()?;

    let url = args.database_url.unwrap_or(config.database.url);
    info!("Running migrations against {url}");

    let database = Database::connect(&url).await?;
    database.migrate().await?;

    info!("Database is up to date");
    Ok(())
}
