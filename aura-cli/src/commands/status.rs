//! Status command - show content and identity summary

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::get_context;
use crate::output::create_table;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context("status")?;
    let status = ctx.status_service.summary()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Aura Status".bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Storage", &status.storage]);
    table.add_row(vec!["View", ctx.current_view().as_str()]);
    table.add_row(vec![
        "Registered identities",
        &status.registered_identities.to_string(),
    ]);
    table.add_row(vec![
        "Session",
        status.session_role.as_deref().unwrap_or("logged out"),
    ]);
    println!("{}", table);
    println!();

    let mut collections = create_table();
    collections.set_header(vec!["Collection", "Total", "Visible"]);
    for c in &status.collections {
        collections.add_row(vec![c.name.clone(), c.total.to_string(), c.visible.to_string()]);
    }
    println!("{}", collections);

    Ok(())
}
