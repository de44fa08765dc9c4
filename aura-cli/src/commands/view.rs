//! View commands - show and change the current view

use anyhow::Result;
use aura_core::View;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run_show() -> Result<()> {
    let ctx = get_context("view")?;
    println!("{}", ctx.current_view().as_str().bold());
    if ctx.shows_admin_shortcut() {
        println!("{}", "Admin shortcut available: 'aura open admin'".dimmed());
    }
    Ok(())
}

pub fn run_open(target: &str) -> Result<()> {
    let target: View = target.parse()?;
    let ctx = get_context("open")?;
    let landed = ctx.navigate(target);

    if landed == target {
        output::success(&format!("Now on {}", landed));
    } else {
        output::warning(&format!("Redirected from {} to {}", target, landed));
    }
    Ok(())
}
