//! Read-only projection of the content document for the public page

use serde::Serialize;

use super::content::{Certificate, ClientLogo, Experience, Project, Service, Testimonial, WebsiteContent};

/// Everything the public page renders, in display order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPage {
    pub hero_title: String,
    pub hero_tagline: String,
    pub hero_image: String,
    pub cta_text: String,
    pub experiences: Vec<Experience>,
    pub about_text: String,
    pub about_image: String,
    pub skills: Vec<String>,
    /// Newest first
    pub projects: Vec<Project>,
    /// Empty when every certificate is hidden; the section is then omitted
    pub certificates: Vec<Certificate>,
    pub services: Vec<Service>,
    pub testimonials: Vec<Testimonial>,
    pub clients: Vec<ClientLogo>,
    pub contact_email: String,
}

impl PublicPage {
    pub fn from_content(content: &WebsiteContent) -> Self {
        Self {
            hero_title: content.hero_title.clone(),
            hero_tagline: content.hero_tagline.clone(),
            hero_image: content.hero_image.clone(),
            cta_text: content.cta_text.clone(),
            experiences: content.experiences.clone(),
            about_text: content.about_text.clone(),
            about_image: content.about_image.clone(),
            skills: content.skills.clone(),
            projects: content.projects_by_date().into_iter().cloned().collect(),
            certificates: content.visible_certificates().into_iter().cloned().collect(),
            services: content.services.clone(),
            testimonials: content.visible_testimonials().into_iter().cloned().collect(),
            clients: content.visible_clients().into_iter().cloned().collect(),
            contact_email: content.contact_email.clone(),
        }
    }

    pub fn shows_certificates(&self) -> bool {
        !self.certificates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_hides_hidden_records_and_sorts_projects() {
        let mut content = WebsiteContent::default();
        content.certificates[0].hidden = true;
        content.projects.reverse();

        let page = PublicPage::from_content(&content);
        assert!(!page.shows_certificates());
        assert_eq!(page.projects[0].date, "2025-01-15");
        assert_eq!(page.testimonials.len(), 1);
    }
}
