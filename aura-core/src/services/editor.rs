//! Admin editor - section tabs, edits and image uploads

use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};
use tokio::sync::watch;

use crate::config::Timings;
use crate::domain::{
    AboutField, CertificateField, ClientField, CollectionEdit, Edit, EditOutcome, HeroField,
    ProjectField, Section, TestimonialField, WebsiteContent,
};
use crate::services::content_store::ContentStore;
use crate::services::logging::{EventKind, LogEvent, LoggingService};
use crate::services::upload::{UploadSource, UploadState, UploadTracker};

/// Where an uploaded image ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSlot {
    Hero,
    About,
    Project(String),
    Testimonial(String),
    Client(String),
    Certificate(String),
}

impl ImageSlot {
    /// Progress key: `hero`, `about_img` or the record id
    pub fn slot_id(&self) -> &str {
        match self {
            ImageSlot::Hero => "hero",
            ImageSlot::About => "about_img",
            ImageSlot::Project(id)
            | ImageSlot::Testimonial(id)
            | ImageSlot::Client(id)
            | ImageSlot::Certificate(id) => id,
        }
    }

    /// Find the slot named by `slot_id` in `content`
    pub fn resolve(slot_id: &str, content: &WebsiteContent) -> Option<Self> {
        let owned = || slot_id.to_string();
        match slot_id {
            "hero" => Some(ImageSlot::Hero),
            "about_img" => Some(ImageSlot::About),
            id if content.projects.iter().any(|r| r.id == id) => Some(ImageSlot::Project(owned())),
            id if content.testimonials.iter().any(|r| r.id == id) => {
                Some(ImageSlot::Testimonial(owned()))
            }
            id if content.clients.iter().any(|r| r.id == id) => Some(ImageSlot::Client(owned())),
            id if content.certificates.iter().any(|r| r.id == id) => {
                Some(ImageSlot::Certificate(owned()))
            }
            _ => None,
        }
    }

    /// The edit that stores `url` in this slot's image field
    pub fn to_edit(&self, url: String) -> Edit {
        match self {
            ImageSlot::Hero => Edit::Hero(HeroField::Image(url)),
            ImageSlot::About => Edit::About(AboutField::Image(url)),
            ImageSlot::Project(id) => {
                Edit::Portfolio(CollectionEdit::update(id.as_str(), ProjectField::ImageUrl(url)))
            }
            ImageSlot::Testimonial(id) => Edit::Testimonials(CollectionEdit::update(
                id.as_str(),
                TestimonialField::ClientImage(url),
            )),
            ImageSlot::Client(id) => {
                Edit::Clients(CollectionEdit::update(id.as_str(), ClientField::LogoUrl(url)))
            }
            ImageSlot::Certificate(id) => Edit::Certificates(CollectionEdit::update(
                id.as_str(),
                CertificateField::ImageUrl(url),
            )),
        }
    }
}

/// The admin surface: one active section, edits, uploads
pub struct AdminEditor {
    store: Arc<ContentStore>,
    active: Mutex<Section>,
    uploads: UploadTracker,
    logger: Option<Arc<LoggingService>>,
}

impl AdminEditor {
    pub fn new(
        store: Arc<ContentStore>,
        timings: &Timings,
        logger: Option<Arc<LoggingService>>,
    ) -> Self {
        Self {
            store,
            active: Mutex::new(Section::Hero),
            uploads: UploadTracker::new(timings.upload_tick, timings.upload_clear_delay),
            logger,
        }
    }

    pub fn active_section(&self) -> Section {
        *self.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn select_section(&self, section: Section) {
        *self.active.lock().unwrap_or_else(|e| e.into_inner()) = section;
    }

    pub fn content(&self) -> WebsiteContent {
        self.store.get()
    }

    /// Apply one edit as a whole-document replace
    pub fn apply(&self, edit: Edit) -> EditOutcome {
        apply_edit(&self.store, self.logger.as_deref(), edit, today())
    }

    /// Start a simulated upload into `slot`
    ///
    /// When it completes, the data URL is written into the slot's image
    /// field. Must be called within a tokio runtime.
    pub fn upload_image(
        &self,
        slot: ImageSlot,
        source: UploadSource,
    ) -> watch::Receiver<UploadState> {
        let store = Arc::clone(&self.store);
        let logger = self.logger.clone();
        let slot_id = slot.slot_id().to_string();

        self.uploads.start(slot_id, source, move |url| {
            let outcome = apply_edit(&store, logger.as_deref(), slot.to_edit(url), today());
            if let Some(logger) = &logger {
                let _ = logger.log(
                    LogEvent::new(EventKind::UploadCompleted).with_section(outcome.section.as_str()),
                );
            }
        })
    }

    pub fn upload_state(&self, slot_id: &str) -> UploadState {
        self.uploads.state(slot_id)
    }

    pub fn upload_progress(&self, slot_id: &str) -> Option<u8> {
        self.uploads.progress(slot_id)
    }

    pub fn cancel_upload(&self, slot_id: &str) -> bool {
        let cancelled = self.uploads.cancel(slot_id);
        if cancelled {
            self.log_cancelled();
        }
        cancelled
    }

    /// Leave the admin surface, cancelling pending uploads
    pub fn close(&self) -> usize {
        let cancelled = self.uploads.cancel_all();
        for _ in 0..cancelled {
            self.log_cancelled();
        }
        cancelled
    }

    fn log_cancelled(&self) {
        if let Some(logger) = &self.logger {
            let _ = logger.log_event(EventKind::UploadCancelled);
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn apply_edit(
    store: &ContentStore,
    logger: Option<&LoggingService>,
    edit: Edit,
    today: NaiveDate,
) -> EditOutcome {
    let section = edit.section();
    let mut outcome = None;
    store.apply(|content| outcome = Some(edit.apply(content, today)));
    tracing::debug!(section = %section, "content updated");

    if let Some(logger) = logger {
        let _ = logger.log(LogEvent::new(EventKind::ContentUpdated).with_section(section.as_str()));
    }
    outcome.unwrap_or(EditOutcome {
        section,
        created_id: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::logging::EntryPoint;
    use std::time::Duration;

    fn editor() -> AdminEditor {
        AdminEditor::new(
            Arc::new(ContentStore::new(WebsiteContent::default())),
            &Timings::default(),
            None,
        )
    }

    #[test]
    fn test_section_switching() {
        let editor = editor();
        assert_eq!(editor.active_section(), Section::Hero);
        editor.select_section(Section::Certificates);
        assert_eq!(editor.active_section(), Section::Certificates);
    }

    #[test]
    fn test_append_then_update_project() {
        let editor = editor();
        let before = editor.content().projects.len();

        let outcome = editor.apply(Edit::Portfolio(CollectionEdit::Append));
        let id = outcome.created_id.unwrap();
        editor.apply(Edit::Portfolio(CollectionEdit::update(
            id.as_str(),
            ProjectField::Title("NEW OP".to_string()),
        )));

        let content = editor.content();
        assert_eq!(content.projects.len(), before + 1);
        assert_eq!(content.projects[0].id, id);
        assert_eq!(content.projects[0].title, "NEW OP");
        assert_eq!(content.projects[0].date, today().format("%Y-%m-%d").to_string());
    }

    #[test]
    fn test_edits_are_logged() {
        let logger = Arc::new(LoggingService::in_memory(EntryPoint::Embedded, "test").unwrap());
        let editor = AdminEditor::new(
            Arc::new(ContentStore::new(WebsiteContent::default())),
            &Timings::default(),
            Some(Arc::clone(&logger)),
        );

        editor.apply(Edit::Hero(HeroField::Tagline("t".to_string())));

        let recent = logger.get_recent(10).unwrap();
        assert_eq!(recent[0].event, "content_updated");
        assert_eq!(recent[0].section.as_deref(), Some("hero"));
    }

    #[test]
    fn test_resolve_slot() {
        let content = WebsiteContent::default();
        let project_id = content.projects[0].id.clone();
        let testimonial_id = content.testimonials[0].id.clone();

        assert_eq!(ImageSlot::resolve("hero", &content), Some(ImageSlot::Hero));
        assert_eq!(ImageSlot::resolve("about_img", &content), Some(ImageSlot::About));
        assert_eq!(
            ImageSlot::resolve(&project_id, &content),
            Some(ImageSlot::Project(project_id.clone()))
        );
        assert_eq!(
            ImageSlot::resolve(&testimonial_id, &content),
            Some(ImageSlot::Testimonial(testimonial_id.clone()))
        );
        assert_eq!(ImageSlot::resolve("nope", &content), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_writes_data_url_into_slot() {
        let editor = editor();
        let mut rx = editor.upload_image(
            ImageSlot::Hero,
            UploadSource::new("hero.webp", b"img".to_vec()),
        );
        rx.wait_for(|state| *state == UploadState::Complete)
            .await
            .unwrap();

        assert_eq!(editor.content().hero_image, "data:image/webp;base64,aW1n");
        assert_eq!(editor.upload_progress("hero"), Some(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_uploads() {
        let editor = editor();
        let original = editor.content().about_image;
        editor.upload_image(ImageSlot::About, UploadSource::new("a.png", vec![1, 2]));

        assert_eq!(editor.close(), 1);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(editor.content().about_image, original);
        assert_eq!(editor.upload_state("about_img"), UploadState::Idle);
    }
}
