//! Structured edits over the content document
//!
//! Every admin action is an [`Edit`]: a variant per editor section, each
//! carrying that section's own field type. [`Edit::apply`] is a pure
//! reducer producing the next document; it never touches storage.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::content::{
    generate_id, Certificate, ClientLogo, Experience, Project, Testimonial, WebsiteContent,
};
use super::result::Error;

/// Admin editor tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Hero,
    About,
    Portfolio,
    Experience,
    Testimonials,
    Clients,
    Certificates,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Hero,
        Section::About,
        Section::Portfolio,
        Section::Experience,
        Section::Testimonials,
        Section::Clients,
        Section::Certificates,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::About => "about",
            Section::Portfolio => "portfolio",
            Section::Experience => "experience",
            Section::Testimonials => "testimonials",
            Section::Clients => "clients",
            Section::Certificates => "certificates",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| Error::validation(format!("Unknown section: {}", s)))
    }
}

/// A record in one of the editable collections
pub trait Record: Clone {
    /// Field setter type for this record
    type Field;

    fn id(&self) -> &str;

    /// New record shown at the top of the list after "append"
    fn placeholder(id: String, today: NaiveDate) -> Self;

    /// Replace one field. The id is not a field and cannot be changed.
    fn set(&mut self, field: Self::Field);

    /// Visibility flag, for records that have one
    fn hidden_mut(&mut self) -> Option<&mut bool> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectField {
    Title(String),
    Description(String),
    Date(String),
    Category(String),
    ImageUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperienceField {
    Title(String),
    Company(String),
    Date(String),
    Description(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestimonialField {
    ClientName(String),
    Content(String),
    ClientImage(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientField {
    LogoUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateField {
    Title(String),
    Date(String),
    ImageUrl(String),
}

impl Record for Project {
    type Field = ProjectField;

    fn id(&self) -> &str {
        &self.id
    }

    fn placeholder(id: String, today: NaiveDate) -> Self {
        Self {
            id,
            title: "UNNAMED_OP".to_string(),
            description: String::new(),
            date: today.format("%Y-%m-%d").to_string(),
            category: "GENERAL".to_string(),
            image_url: String::new(),
            order: 0,
        }
    }

    fn set(&mut self, field: ProjectField) {
        match field {
            ProjectField::Title(v) => self.title = v,
            ProjectField::Description(v) => self.description = v,
            ProjectField::Date(v) => self.date = v,
            ProjectField::Category(v) => self.category = v,
            ProjectField::ImageUrl(v) => self.image_url = v,
        }
    }
}

impl Record for Experience {
    type Field = ExperienceField;

    fn id(&self) -> &str {
        &self.id
    }

    fn placeholder(id: String, _today: NaiveDate) -> Self {
        Self {
            id,
            title: "ROLE_NAME".to_string(),
            company: "ORG".to_string(),
            date: "20XX - 20XX".to_string(),
            description: String::new(),
        }
    }

    fn set(&mut self, field: ExperienceField) {
        match field {
            ExperienceField::Title(v) => self.title = v,
            ExperienceField::Company(v) => self.company = v,
            ExperienceField::Date(v) => self.date = v,
            ExperienceField::Description(v) => self.description = v,
        }
    }
}

impl Record for Testimonial {
    type Field = TestimonialField;

    fn id(&self) -> &str {
        &self.id
    }

    fn placeholder(id: String, _today: NaiveDate) -> Self {
        Self {
            id,
            client_name: "NAME".to_string(),
            content: String::new(),
            client_image: String::new(),
            hidden: false,
        }
    }

    fn set(&mut self, field: TestimonialField) {
        match field {
            TestimonialField::ClientName(v) => self.client_name = v,
            TestimonialField::Content(v) => self.content = v,
            TestimonialField::ClientImage(v) => self.client_image = v,
        }
    }

    fn hidden_mut(&mut self) -> Option<&mut bool> {
        Some(&mut self.hidden)
    }
}

impl Record for ClientLogo {
    type Field = ClientField;

    fn id(&self) -> &str {
        &self.id
    }

    fn placeholder(id: String, _today: NaiveDate) -> Self {
        Self {
            id,
            logo_url: String::new(),
            hidden: false,
        }
    }

    fn set(&mut self, field: ClientField) {
        match field {
            ClientField::LogoUrl(v) => self.logo_url = v,
        }
    }

    fn hidden_mut(&mut self) -> Option<&mut bool> {
        Some(&mut self.hidden)
    }
}

impl Record for Certificate {
    type Field = CertificateField;

    fn id(&self) -> &str {
        &self.id
    }

    fn placeholder(id: String, _today: NaiveDate) -> Self {
        Self {
            id,
            title: "CERT_NAME".to_string(),
            date: "20XX".to_string(),
            image_url: String::new(),
            hidden: false,
        }
    }

    fn set(&mut self, field: CertificateField) {
        match field {
            CertificateField::Title(v) => self.title = v,
            CertificateField::Date(v) => self.date = v,
            CertificateField::ImageUrl(v) => self.image_url = v,
        }
    }

    fn hidden_mut(&mut self) -> Option<&mut bool> {
        Some(&mut self.hidden)
    }
}

/// Operation on one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionEdit<F> {
    /// Prepend a placeholder record with a fresh id
    Append,
    /// Replace one field of every record with this id
    Update { id: String, field: F },
    /// Remove every record with this id (no-op if absent)
    Delete { id: String },
    /// Flip the `hidden` flag of every record with this id (no-op for
    /// records without one)
    ToggleHidden { id: String },
}

impl<F> CollectionEdit<F> {
    pub fn update(id: impl Into<String>, field: F) -> Self {
        Self::Update { id: id.into(), field }
    }

    pub fn delete(id: impl Into<String>) -> Self {
        Self::Delete { id: id.into() }
    }

    pub fn toggle_hidden(id: impl Into<String>) -> Self {
        Self::ToggleHidden { id: id.into() }
    }

    /// Apply to a collection, returning the id of the record created by an
    /// append
    fn apply_to<R>(self, records: &mut Vec<R>, today: NaiveDate) -> Option<String>
    where
        R: Record<Field = F>,
        F: Clone,
    {
        match self {
            CollectionEdit::Append => {
                let id = generate_id();
                records.insert(0, R::placeholder(id.clone(), today));
                Some(id)
            }
            CollectionEdit::Update { id, field } => {
                records
                    .iter_mut()
                    .filter(|r| r.id() == id)
                    .for_each(|r| r.set(field.clone()));
                None
            }
            CollectionEdit::Delete { id } => {
                records.retain(|r| r.id() != id);
                None
            }
            CollectionEdit::ToggleHidden { id } => {
                records
                    .iter_mut()
                    .filter(|r| r.id() == id)
                    .filter_map(|r| r.hidden_mut())
                    .for_each(|hidden| *hidden = !*hidden);
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeroField {
    Title(String),
    Tagline(String),
    Image(String),
    CtaText(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AboutField {
    Text(String),
    Image(String),
    Skills(Vec<String>),
}

/// Split the comma-separated skill input into a skill list
///
/// Parts are trimmed but kept even when empty, so a trailing comma while
/// typing shows up as an empty entry.
pub fn parse_skills(input: &str) -> Vec<String> {
    input.split(',').map(|s| s.trim().to_string()).collect()
}

/// One admin action, tagged by the section it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Hero(HeroField),
    About(AboutField),
    Portfolio(CollectionEdit<ProjectField>),
    Experience(CollectionEdit<ExperienceField>),
    Testimonials(CollectionEdit<TestimonialField>),
    Clients(CollectionEdit<ClientField>),
    Certificates(CollectionEdit<CertificateField>),
}

/// What an edit did to the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub section: Section,
    /// Id of the record created by an append
    pub created_id: Option<String>,
}

impl Edit {
    pub fn section(&self) -> Section {
        match self {
            Edit::Hero(_) => Section::Hero,
            Edit::About(_) => Section::About,
            Edit::Portfolio(_) => Section::Portfolio,
            Edit::Experience(_) => Section::Experience,
            Edit::Testimonials(_) => Section::Testimonials,
            Edit::Clients(_) => Section::Clients,
            Edit::Certificates(_) => Section::Certificates,
        }
    }

    /// Apply this edit to `content` in place
    ///
    /// `today` is the date given to new projects.
    pub fn apply(self, content: &mut WebsiteContent, today: NaiveDate) -> EditOutcome {
        let section = self.section();
        let created_id = match self {
            Edit::Hero(field) => {
                match field {
                    HeroField::Title(v) => content.hero_title = v,
                    HeroField::Tagline(v) => content.hero_tagline = v,
                    HeroField::Image(v) => content.hero_image = v,
                    HeroField::CtaText(v) => content.cta_text = v,
                }
                None
            }
            Edit::About(field) => {
                match field {
                    AboutField::Text(v) => content.about_text = v,
                    AboutField::Image(v) => content.about_image = v,
                    AboutField::Skills(v) => content.skills = v,
                }
                None
            }
            Edit::Portfolio(op) => op.apply_to(&mut content.projects, today),
            Edit::Experience(op) => op.apply_to(&mut content.experiences, today),
            Edit::Testimonials(op) => op.apply_to(&mut content.testimonials, today),
            Edit::Clients(op) => op.apply_to(&mut content.clients, today),
            Edit::Certificates(op) => op.apply_to(&mut content.certificates, today),
        };
        EditOutcome { section, created_id }
    }
}
