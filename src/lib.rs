pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod http;
pub mod realtime;
pub mod services;

use anyhow::{bail, Result};
use clap::Parser;
use cli::Cli;
use log::info;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::database::{profiles, setup};
use crate::services::server::ServerService;
use crate::services::watcher::WatchService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_init() -> Result<()> {
    let config = AppConfig::new();
    let pool = database::create_pool(&config.server.database_path)?;
    let conn = database::get_connection(&pool)?;
    setup::reset_database(&conn)?;
    info!("Initialized database at {}", config.server.database_path);
    Ok(())
}

pub fn handle_promote(username: &str) -> Result<()> {
    let config = AppConfig::new();
    let pool = database::create_pool(&config.server.database_path)?;
    let conn = database::get_connection(&pool)?;
    if !profiles::set_admin(&conn, username, true)? {
        bail!("No profile named {}", username);
    }
    info!("{} is now an admin", username);
    Ok(())
}

pub fn handle_watch(server: &str) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = WatchService::new(server, &config)?;
        service.run().await
    })
}
