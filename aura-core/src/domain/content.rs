//! Site content document
//!
//! `WebsiteContent` is the single document holding every piece of editable
//! copy on the public page. It serializes to the camelCase JSON stored under
//! the content key, so documents written by the browser build load unchanged.

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Last id handed out, so ids stay strictly increasing within one process
static LAST_ID: AtomicU64 = AtomicU64::new(0);

/// Generate a record id from the current timestamp (unix milliseconds)
///
/// Two calls in the same millisecond get consecutive values rather than
/// the same one. No check is made against ids already in a document.
pub fn generate_id() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_ID.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next.to_string(),
            Err(actual) => last = actual,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    pub category: String,
    pub image_url: String,
    #[serde(default)]
    pub order: i64,
}

impl Project {
    /// Parsed `date`, if it is a valid calendar date
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    pub title: String,
    pub company: String,
    /// Free-form range such as "2022 - Present"
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: String,
    pub client_name: String,
    pub content: String,
    pub client_image: String,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientLogo {
    pub id: String,
    pub logo_url: String,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: String,
    pub title: String,
    pub date: String,
    pub image_url: String,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
}

/// The whole editable site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteContent {
    pub hero_title: String,
    pub hero_tagline: String,
    pub hero_image: String,
    pub cta_text: String,
    pub about_text: String,
    pub about_image: String,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub experiences: Vec<Experience>,
    pub testimonials: Vec<Testimonial>,
    pub clients: Vec<ClientLogo>,
    pub certificates: Vec<Certificate>,
    pub services: Vec<Service>,
    pub contact_email: String,
}

impl WebsiteContent {
    /// Projects newest first
    ///
    /// Sorting is stable; projects whose date does not parse go last.
    pub fn projects_by_date(&self) -> Vec<&Project> {
        let mut projects: Vec<&Project> = self.projects.iter().collect();
        projects.sort_by(|a, b| match (a.parsed_date(), b.parsed_date()) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => CmpOrdering::Less,
            (None, Some(_)) => CmpOrdering::Greater,
            (None, None) => CmpOrdering::Equal,
        });
        projects
    }

    pub fn visible_testimonials(&self) -> Vec<&Testimonial> {
        self.testimonials.iter().filter(|t| !t.hidden).collect()
    }

    pub fn visible_clients(&self) -> Vec<&ClientLogo> {
        self.clients.iter().filter(|c| !c.hidden).collect()
    }

    pub fn visible_certificates(&self) -> Vec<&Certificate> {
        self.certificates.iter().filter(|c| !c.hidden).collect()
    }
}

impl Default for WebsiteContent {
    /// Built-in content used when nothing has been saved yet
    fn default() -> Self {
        Self {
            hero_title: "ALEX RIVERA".to_string(),
            hero_tagline: "Breaking the boundaries of digital aesthetics through high-contrast motion and experimental layout design.".to_string(),
            hero_image: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?auto=format&fit=crop&q=80&w=800".to_string(),
            cta_text: "View Portfolio".to_string(),
            about_text: "I am a visual engineer focused on creating digital experiences that demand attention. By blending technical precision with creative chaos, I help brands navigate the intersection of art and technology.".to_string(),
            about_image: "https://images.unsplash.com/photo-1542744094-24638eff58bb?auto=format&fit=crop&q=80&w=800".to_string(),
            skills: vec![
                "Creative Direction".to_string(),
                "Motion Systems".to_string(),
                "Brand Evolution".to_string(),
                "Interface Design".to_string(),
            ],
            projects: vec![
                Project {
                    id: "1".to_string(),
                    title: "NEON DREAMS".to_string(),
                    description: "A cyberpunk visual exploration.".to_string(),
                    date: "2025-01-15".to_string(),
                    category: "Creative Direction".to_string(),
                    image_url: "https://images.unsplash.com/photo-1614850523296-d8c1af93d400?auto=format&fit=crop&q=80&w=800".to_string(),
                    order: 0,
                },
                Project {
                    id: "2".to_string(),
                    title: "VOID SYSTEMS".to_string(),
                    description: "Minimalist UI evolution.".to_string(),
                    date: "2024-12-01".to_string(),
                    category: "UI Evolution".to_string(),
                    image_url: "https://images.unsplash.com/photo-1558591710-4b4a1ae0f04d?auto=format&fit=crop&q=80&w=800".to_string(),
                    order: 1,
                },
            ],
            experiences: vec![Experience {
                id: "e1".to_string(),
                title: "Senior Visual Designer".to_string(),
                company: "Aura Labs".to_string(),
                date: "2022 - Present".to_string(),
                description: "Leading creative direction for high-fidelity digital products.".to_string(),
            }],
            testimonials: vec![Testimonial {
                id: "t1".to_string(),
                client_name: "Sarah Jenkins".to_string(),
                content: "Alex transformed our brand identity into something truly visionary.".to_string(),
                client_image: "https://images.unsplash.com/photo-1494790108377-be9c29b29330?auto=format&fit=crop&q=80&w=150".to_string(),
                hidden: false,
            }],
            clients: vec![ClientLogo {
                id: "c1".to_string(),
                logo_url: "https://upload.wikimedia.org/wikipedia/commons/a/a9/Amazon_logo.svg".to_string(),
                hidden: false,
            }],
            certificates: vec![Certificate {
                id: "cert1".to_string(),
                title: "Advanced Motion Design".to_string(),
                date: "2023".to_string(),
                image_url: "https://images.unsplash.com/photo-1589330694653-960436d655f4?auto=format&fit=crop&q=80&w=400".to_string(),
                hidden: false,
            }],
            services: vec![Service {
                id: "s1".to_string(),
                title: "Brand Disrupt".to_string(),
                description: "Identity systems for the modern age.".to_string(),
                icon: "⚡".to_string(),
            }],
            contact_email: "vision@alexrivera.design".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, date: &str) -> Project {
        Project {
            id: id.to_string(),
            title: id.to_uppercase(),
            description: String::new(),
            date: date.to_string(),
            category: "GENERAL".to_string(),
            image_url: String::new(),
            order: 0,
        }
    }

    #[test]
    fn test_projects_sorted_newest_first_regardless_of_insertion() {
        let mut content = WebsiteContent::default();
        content.projects = vec![project("old", "2024-01-01"), project("new", "2025-06-01")];
        let dates: Vec<&str> = content.projects_by_date().iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-06-01", "2024-01-01"]);

        content.projects.reverse();
        let dates: Vec<&str> = content.projects_by_date().iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-06-01", "2024-01-01"]);

        // Stored order is untouched
        assert_eq!(content.projects[0].id, "new");
    }

    #[test]
    fn test_unparseable_project_dates_go_last() {
        let mut content = WebsiteContent::default();
        content.projects = vec![
            project("a", "someday"),
            project("b", "2023-03-03"),
            project("c", ""),
        ];
        let ids: Vec<&str> = content.projects_by_date().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_hidden_records_are_filtered_from_visible_views() {
        let mut content = WebsiteContent::default();
        content.testimonials[0].hidden = true;
        content.clients[0].hidden = true;
        assert!(content.visible_testimonials().is_empty());
        assert!(content.visible_clients().is_empty());
        assert_eq!(content.visible_certificates().len(), 1);
        assert_eq!(content.testimonials.len(), 1);
    }

    #[test]
    fn test_generate_id_is_strictly_increasing() {
        let ids: Vec<u64> = (0..50).map(|_| generate_id().parse().unwrap()).collect();
        for pair in ids.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_camel_case_round_trip() {
        let content = WebsiteContent::default();
        let json = serde_json::to_value(&content).unwrap();
        assert!(json.get("heroTitle").is_some());
        assert!(json["projects"][0].get("imageUrl").is_some());
        assert!(json["testimonials"][0].get("clientName").is_some());

        let back: WebsiteContent = serde_json::from_value(json).unwrap();
        assert_eq!(back, content);
    }
}
