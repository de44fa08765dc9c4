//! CLI command implementations

pub mod auth;
pub mod edit;
pub mod logs;
pub mod show;
pub mod status;
pub mod upload;
pub mod view;

use std::path::PathBuf;

use anyhow::{Context, Result};
use aura_core::services::EntryPoint;
use aura_core::AuraContext;

/// Get the aura directory from environment or default
pub fn get_aura_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("AURA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".aura"))
        .context("Could not find home directory; set AURA_DIR")
}

/// Get or create the aura context, recording the command in the event log
pub fn get_context(command: &str) -> Result<AuraContext> {
    let aura_dir = get_aura_dir()?;
    let ctx = AuraContext::new(&aura_dir, EntryPoint::Cli)
        .with_context(|| format!("Failed to initialize aura context in {:?}", aura_dir))?;
    ctx.log_command(command);
    Ok(ctx)
}

/// Runtime for the commands that wait on simulated latency
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}
