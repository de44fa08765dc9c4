//! Edit command - admin content editing

use anyhow::{Context, Result};
use aura_core::domain::{
    parse_skills, AboutField, CertificateField, ClientField, CollectionEdit, Edit,
    ExperienceField, HeroField, ProjectField, TestimonialField,
};
use aura_core::{AuraContext, Section, WebsiteContent};
use clap::Subcommand;
use colored::Colorize;

use super::get_context;
use crate::output::{self, create_table, truncate};

#[derive(Subcommand)]
pub enum EditCommands {
    /// List the records of a section, hidden ones included
    List {
        /// Section (hero, about, portfolio, experience, testimonials, clients, certificates)
        section: String,
    },
    /// Hero banner
    Hero {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        tagline: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        cta: Option<String>,
    },
    /// About section
    About {
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        image: Option<String>,
        /// Comma-separated skills
        #[arg(long)]
        skills: Option<String>,
    },
    /// Portfolio projects
    Portfolio {
        #[command(subcommand)]
        action: ProjectAction,
    },
    /// Experience timeline
    Experience {
        #[command(subcommand)]
        action: ExperienceAction,
    },
    /// Client testimonials
    Testimonials {
        #[command(subcommand)]
        action: TestimonialAction,
    },
    /// Client logos
    Clients {
        #[command(subcommand)]
        action: ClientAction,
    },
    /// Certificates
    Certificates {
        #[command(subcommand)]
        action: CertificateAction,
    },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Add a placeholder project at the top
    Add,
    /// Change fields of a project
    Set {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Delete a project
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum ExperienceAction {
    /// Add a placeholder role at the top
    Add,
    /// Change fields of a role
    Set {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a role
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum TestimonialAction {
    /// Add a placeholder testimonial at the top
    Add,
    /// Change fields of a testimonial
    Set {
        id: String,
        #[arg(long)]
        client_name: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        client_image: Option<String>,
    },
    /// Delete a testimonial
    Delete { id: String },
    /// Show or hide a testimonial on the public page
    Toggle { id: String },
}

#[derive(Subcommand)]
pub enum ClientAction {
    /// Add a placeholder logo at the top
    Add,
    /// Change the logo image
    Set {
        id: String,
        #[arg(long)]
        logo_url: Option<String>,
    },
    /// Delete a logo
    Delete { id: String },
    /// Show or hide a logo on the public page
    Toggle { id: String },
}

#[derive(Subcommand)]
pub enum CertificateAction {
    /// Add a placeholder certificate at the top
    Add,
    /// Change fields of a certificate
    Set {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Delete a certificate
    Delete { id: String },
    /// Show or hide a certificate on the public page
    Toggle { id: String },
}

/// Turn set-style flags into one update per given field
fn updates<F>(id: &str, fields: Vec<Option<F>>) -> Vec<CollectionEdit<F>> {
    fields
        .into_iter()
        .flatten()
        .map(|field| CollectionEdit::update(id, field))
        .collect()
}

fn into_edits(command: EditCommands) -> Vec<Edit> {
    match command {
        EditCommands::List { .. } => Vec::new(),
        EditCommands::Hero {
            title,
            tagline,
            image,
            cta,
        } => [
            title.map(HeroField::Title),
            tagline.map(HeroField::Tagline),
            image.map(HeroField::Image),
            cta.map(HeroField::CtaText),
        ]
        .into_iter()
        .flatten()
        .map(Edit::Hero)
        .collect(),
        EditCommands::About {
            text,
            image,
            skills,
        } => [
            text.map(AboutField::Text),
            image.map(AboutField::Image),
            skills.map(|s| AboutField::Skills(parse_skills(&s))),
        ]
        .into_iter()
        .flatten()
        .map(Edit::About)
        .collect(),
        EditCommands::Portfolio { action } => match action {
            ProjectAction::Add => vec![CollectionEdit::Append],
            ProjectAction::Delete { id } => vec![CollectionEdit::delete(id)],
            ProjectAction::Set {
                id,
                title,
                description,
                date,
                category,
                image_url,
            } => updates(
                &id,
                vec![
                    title.map(ProjectField::Title),
                    description.map(ProjectField::Description),
                    date.map(ProjectField::Date),
                    category.map(ProjectField::Category),
                    image_url.map(ProjectField::ImageUrl),
                ],
            ),
        }
        .into_iter()
        .map(Edit::Portfolio)
        .collect(),
        EditCommands::Experience { action } => match action {
            ExperienceAction::Add => vec![CollectionEdit::Append],
            ExperienceAction::Delete { id } => vec![CollectionEdit::delete(id)],
            ExperienceAction::Set {
                id,
                title,
                company,
                date,
                description,
            } => updates(
                &id,
                vec![
                    title.map(ExperienceField::Title),
                    company.map(ExperienceField::Company),
                    date.map(ExperienceField::Date),
                    description.map(ExperienceField::Description),
                ],
            ),
        }
        .into_iter()
        .map(Edit::Experience)
        .collect(),
        EditCommands::Testimonials { action } => match action {
            TestimonialAction::Add => vec![CollectionEdit::Append],
            TestimonialAction::Delete { id } => vec![CollectionEdit::delete(id)],
            TestimonialAction::Toggle { id } => vec![CollectionEdit::toggle_hidden(id)],
            TestimonialAction::Set {
                id,
                client_name,
                content,
                client_image,
            } => updates(
                &id,
                vec![
                    client_name.map(TestimonialField::ClientName),
                    content.map(TestimonialField::Content),
                    client_image.map(TestimonialField::ClientImage),
                ],
            ),
        }
        .into_iter()
        .map(Edit::Testimonials)
        .collect(),
        EditCommands::Clients { action } => match action {
            ClientAction::Add => vec![CollectionEdit::Append],
            ClientAction::Delete { id } => vec![CollectionEdit::delete(id)],
            ClientAction::Toggle { id } => vec![CollectionEdit::toggle_hidden(id)],
            ClientAction::Set { id, logo_url } => {
                updates(&id, vec![logo_url.map(ClientField::LogoUrl)])
            }
        }
        .into_iter()
        .map(Edit::Clients)
        .collect(),
        EditCommands::Certificates { action } => match action {
            CertificateAction::Add => vec![CollectionEdit::Append],
            CertificateAction::Delete { id } => vec![CollectionEdit::delete(id)],
            CertificateAction::Toggle { id } => vec![CollectionEdit::toggle_hidden(id)],
            CertificateAction::Set {
                id,
                title,
                date,
                image_url,
            } => updates(
                &id,
                vec![
                    title.map(CertificateField::Title),
                    date.map(CertificateField::Date),
                    image_url.map(CertificateField::ImageUrl),
                ],
            ),
        }
        .into_iter()
        .map(Edit::Certificates)
        .collect(),
    }
}

/// Open the admin view, failing for anyone but the admin
pub fn open_admin(ctx: &AuraContext) -> Result<()> {
    if !ctx.session.is_admin() {
        anyhow::bail!("ACCESS_DENIED: Admin session required. Log in with the admin identity first.");
    }
    ctx.open_admin();
    Ok(())
}

pub fn run(command: EditCommands) -> Result<()> {
    let ctx = get_context("edit")?;
    open_admin(&ctx)?;
    let editor = ctx.admin_editor().context("Admin view unavailable")?;

    if let EditCommands::List { section } = &command {
        let section: Section = section.parse()?;
        editor.select_section(section);
        print_section(&editor.content(), section);
        return Ok(());
    }

    let edits = into_edits(command);
    let Some(section) = edits.first().map(Edit::section) else {
        output::warning("Nothing to change.");
        return Ok(());
    };
    editor.select_section(section);

    for edit in edits {
        let outcome = editor.apply(edit);
        if let Some(id) = outcome.created_id {
            output::success(&format!("Added {} record {}", section, id));
        }
    }
    output::success(&format!("Saved {}", section));
    Ok(())
}

fn print_section(content: &WebsiteContent, section: Section) {
    let hidden = |h: bool| if h { "hidden".yellow().to_string() } else { String::new() };
    let mut table = create_table();

    match section {
        Section::Hero => {
            table.set_header(vec!["Field", "Value"]);
            table.add_row(vec!["title".to_string(), content.hero_title.clone()]);
            table.add_row(vec!["tagline".to_string(), content.hero_tagline.clone()]);
            table.add_row(vec!["image".to_string(), truncate(&content.hero_image, 60)]);
            table.add_row(vec!["cta".to_string(), content.cta_text.clone()]);
        }
        Section::About => {
            table.set_header(vec!["Field", "Value"]);
            table.add_row(vec!["text".to_string(), truncate(&content.about_text, 80)]);
            table.add_row(vec!["image".to_string(), truncate(&content.about_image, 60)]);
            table.add_row(vec!["skills".to_string(), content.skills.join(", ")]);
        }
        Section::Portfolio => {
            table.set_header(vec!["Id", "Date", "Title", "Category"]);
            for p in &content.projects {
                table.add_row(vec![p.id.clone(), p.date.clone(), p.title.clone(), p.category.clone()]);
            }
        }
        Section::Experience => {
            table.set_header(vec!["Id", "Date", "Title", "Company"]);
            for e in &content.experiences {
                table.add_row(vec![e.id.clone(), e.date.clone(), e.title.clone(), e.company.clone()]);
            }
        }
        Section::Testimonials => {
            table.set_header(vec!["Id", "Client", "Content", ""]);
            for t in &content.testimonials {
                table.add_row(vec![
                    t.id.clone(),
                    t.client_name.clone(),
                    truncate(&t.content, 50),
                    hidden(t.hidden),
                ]);
            }
        }
        Section::Clients => {
            table.set_header(vec!["Id", "Logo", ""]);
            for c in &content.clients {
                table.add_row(vec![c.id.clone(), truncate(&c.logo_url, 60), hidden(c.hidden)]);
            }
        }
        Section::Certificates => {
            table.set_header(vec!["Id", "Date", "Title", ""]);
            for c in &content.certificates {
                table.add_row(vec![c.id.clone(), c.date.clone(), c.title.clone(), hidden(c.hidden)]);
            }
        }
    }
    println!("{}", table);
}
