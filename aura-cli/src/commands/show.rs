//! Show command - render the public page

use anyhow::Result;
use colored::Colorize;

use super::{get_context, runtime};
use crate::output::{create_table, or_dash, spinner, truncate};

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context("show")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ctx.public_page())?);
        return Ok(());
    }

    let splash = spinner("INITIALIZING AURA...");
    runtime()?.block_on(ctx.boot());
    splash.finish_and_clear();

    let page = ctx.public_page();

    println!("{}", page.hero_title.bold());
    println!("{}", page.hero_tagline);
    println!("[{}]", page.cta_text.cyan());
    println!();

    if !page.experiences.is_empty() {
        println!("{}", "Experience".bold());
        for exp in &page.experiences {
            println!("  {} @ {} ({})", exp.title, exp.company, exp.date.dimmed());
            if !exp.description.is_empty() {
                println!("    {}", exp.description);
            }
        }
        println!();
    }

    println!("{}", "About".bold());
    println!("{}", page.about_text);
    if !page.skills.is_empty() {
        println!("Skills: {}", page.skills.join(", "));
    }
    println!();

    if !page.projects.is_empty() {
        println!("{}", "Portfolio".bold());
        let mut table = create_table();
        table.set_header(vec!["Date", "Title", "Category", "Description"]);
        for project in &page.projects {
            table.add_row(vec![
                project.date.clone(),
                project.title.clone(),
                project.category.clone(),
                truncate(&project.description, 60),
            ]);
        }
        println!("{}", table);
        println!();
    }

    if page.shows_certificates() {
        println!("{}", "Certificates".bold());
        for cert in &page.certificates {
            println!("  {} ({})", cert.title, cert.date.dimmed());
        }
        println!();
    }

    if !page.services.is_empty() {
        println!("{}", "Services".bold());
        for service in &page.services {
            println!("  {} - {}", service.title, service.description);
        }
        println!();
    }

    if !page.testimonials.is_empty() {
        println!("{}", "Testimonials".bold());
        for t in &page.testimonials {
            println!("  \"{}\"", t.content);
            println!("    - {}", t.client_name.dimmed());
        }
        println!();
    }

    if !page.clients.is_empty() {
        println!("{}", "Clients".bold());
        for client in &page.clients {
            println!("  {}", or_dash(&truncate(&client.logo_url, 60)));
        }
        println!();
    }

    println!("Contact: {}", page.contact_email.cyan());

    if ctx.shows_admin_shortcut() {
        println!();
        println!("{}", "Admin: run 'aura open admin'".dimmed());
    }

    Ok(())
}
