//! Core domain entities
//!
//! All site entities are defined here. These are pure data structures and
//! reducers - no I/O or external dependencies.

pub mod content;
pub mod edit;
pub mod public;
pub mod result;
mod user;
mod view;

pub use content::{
    generate_id, Certificate, ClientLogo, Experience, Project, Service, Testimonial,
    WebsiteContent,
};
pub use edit::{
    parse_skills, AboutField, CertificateField, ClientField, CollectionEdit, Edit, EditOutcome,
    ExperienceField, HeroField, ProjectField, Record, Section, TestimonialField,
};
pub use public::PublicPage;
pub use user::{is_admin_email, normalize_email, Role, User, ADMIN_EMAIL};
pub use view::View;
