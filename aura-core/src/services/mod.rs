//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

pub mod auth;
pub mod content_store;
pub mod editor;
pub mod identity;
pub mod logging;
pub mod migration;
pub mod router;
pub mod session;
mod status;
pub mod upload;

pub use auth::{AuthError, AuthFlow, AuthForm, AuthMode};
pub use content_store::{ContentObserver, ContentStore, PersistContent};
pub use editor::{AdminEditor, ImageSlot};
pub use identity::IdentityRegistry;
pub use logging::{EntryPoint, EventKind, LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use router::ViewRouter;
pub use session::SessionStore;
pub use status::{CollectionSummary, StatusService, StatusSummary};
pub use upload::{UploadSource, UploadState, UploadTracker};
