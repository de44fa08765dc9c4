//! Status service - content and identity summaries

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use crate::config::StorageBackend;
use crate::services::content_store::ContentStore;
use crate::services::identity::IdentityRegistry;
use crate::services::session::SessionStore;

/// Status service for the site summary
pub struct StatusService {
    store: Arc<ContentStore>,
    registry: Arc<IdentityRegistry>,
    session: Arc<SessionStore>,
    backend: StorageBackend,
}

impl StatusService {
    pub fn new(
        store: Arc<ContentStore>,
        registry: Arc<IdentityRegistry>,
        session: Arc<SessionStore>,
        backend: StorageBackend,
    ) -> Self {
        Self {
            store,
            registry,
            session,
            backend,
        }
    }

    /// Get overall status summary
    pub fn summary(&self) -> Result<StatusSummary> {
        let content = self.store.get();
        let collection = |name: &str, total: usize, visible: usize| CollectionSummary {
            name: name.to_string(),
            total,
            visible,
        };

        Ok(StatusSummary {
            storage: self.backend.to_string(),
            registered_identities: self.registry.count()?,
            session_role: self.session.current().map(|u| u.role.as_str().to_string()),
            collections: vec![
                collection("portfolio", content.projects.len(), content.projects.len()),
                collection("experience", content.experiences.len(), content.experiences.len()),
                collection(
                    "testimonials",
                    content.testimonials.len(),
                    content.visible_testimonials().len(),
                ),
                collection("clients", content.clients.len(), content.visible_clients().len()),
                collection(
                    "certificates",
                    content.certificates.len(),
                    content.visible_certificates().len(),
                ),
                collection("services", content.services.len(), content.services.len()),
                collection("skills", content.skills.len(), content.skills.len()),
            ],
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub storage: String,
    pub registered_identities: usize,
    pub session_role: Option<String>,
    pub collections: Vec<CollectionSummary>,
}

#[derive(Debug, Serialize)]
pub struct CollectionSummary {
    pub name: String,
    pub total: usize,
    pub visible: usize,
}
