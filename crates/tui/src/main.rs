mod app;
mod client;
mod config;
mod error;
mod ui;

use std::{fs::OpenOptions, sync::Mutex};

use crate::{config::AppConfig, error::Result};

/// The terminal belongs to the UI, so logs only go to a file when one is set.
fn init_logging(config: &AppConfig) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_logging(&config)?;
    tracing::info!(base_url = %config.base_url, "starting");
    let mut app = app::App::new(config)?;
    app.run().await?;
    Ok(())
}
