//! Aura Core - Business logic for the Aura portfolio site
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities and reducers (WebsiteContent, Edit, User, View)
//! - **ports**: Trait definitions for external dependencies (KeyValueStore)
//! - **services**: Business logic orchestration (content store, auth, router, editor)
//! - **adapters**: Concrete implementations (memory, JSON files, DuckDB)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;

use adapters::{DuckDbStore, JsonFileStore};
use config::{Config, StorageBackend};
use ports::{keys, KeyValueStore, KeyValueStoreExt};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{Edit, EditOutcome, PublicPage, Section, User, View, WebsiteContent};

/// Main context for Aura operations
///
/// This is the primary entry point for all business logic. It holds the
/// storage backend, configuration, and all services, and owns the view
/// router so that session changes and navigation go through the guards.
pub struct AuraContext {
    pub config: Config,
    pub storage: Arc<dyn KeyValueStore>,
    pub logger: Option<Arc<LoggingService>>,
    pub content: Arc<ContentStore>,
    pub registry: Arc<IdentityRegistry>,
    pub session: Arc<SessionStore>,
    pub auth: AuthFlow,
    pub editor: AdminEditor,
    pub status_service: StatusService,
    router: Mutex<ViewRouter>,
    persist_view: bool,
    loaded: AtomicBool,
}

impl AuraContext {
    /// Create a new Aura context over the data directory
    ///
    /// The CLI keeps the current view in storage between invocations.
    pub fn new(aura_dir: &Path, entry_point: EntryPoint) -> Result<Self> {
        std::fs::create_dir_all(aura_dir)?;
        let config = Config::load(aura_dir)?;

        let storage: Arc<dyn KeyValueStore> = match config.storage {
            StorageBackend::Json => Arc::new(JsonFileStore::new(&store_dir(aura_dir))?),
            StorageBackend::Duckdb => Arc::new(DuckDbStore::new(&aura_dir.join("aura.duckdb"))?),
        };

        // Event logging is best effort
        let logger = match LoggingService::new(aura_dir, entry_point, env!("CARGO_PKG_VERSION")) {
            Ok(logger) => Some(Arc::new(logger)),
            Err(e) => {
                tracing::warn!("event log unavailable: {}", e);
                None
            }
        };

        let mut context = Self::with_storage(config, storage, logger);
        if entry_point == EntryPoint::Cli {
            context.persist_view = true;
            context.restore_view();
        }
        Ok(context)
    }

    /// Create a context over an existing storage backend
    pub fn with_storage(
        config: Config,
        storage: Arc<dyn KeyValueStore>,
        logger: Option<Arc<LoggingService>>,
    ) -> Self {
        let content = Arc::new(ContentStore::load(storage.as_ref()));
        content.subscribe(Arc::new(PersistContent::new(
            Arc::clone(&storage),
            logger.clone(),
        )));

        let registry = Arc::new(IdentityRegistry::new(Arc::clone(&storage)));
        let session = Arc::new(SessionStore::load(Arc::clone(&storage)));
        let auth = AuthFlow::new(Arc::clone(&registry), config.timings.auth_latency);
        let editor = AdminEditor::new(Arc::clone(&content), &config.timings, logger.clone());
        let status_service = StatusService::new(
            Arc::clone(&content),
            Arc::clone(&registry),
            Arc::clone(&session),
            config.storage,
        );

        Self {
            config,
            storage,
            logger,
            content,
            registry,
            session,
            auth,
            editor,
            status_service,
            router: Mutex::new(ViewRouter::new()),
            persist_view: false,
            loaded: AtomicBool::new(false),
        }
    }

    /// Show the init splash for the configured delay, then mark loaded
    pub async fn boot(&self) {
        tokio::time::sleep(self.config.timings.boot_delay).await;
        self.loaded.store(true, Ordering::SeqCst);
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    pub fn current_view(&self) -> View {
        self.router().current()
    }

    /// Navigate to `target`; the guards decide where we end up
    pub fn navigate(&self, target: View) -> View {
        let session = self.session.current();
        self.route(|router| router.navigate(target, session.as_ref()))
    }

    pub fn open_admin(&self) -> View {
        self.navigate(View::Admin)
    }

    pub fn close_admin(&self) -> View {
        self.navigate(View::Home)
    }

    pub fn cancel_auth(&self) -> View {
        self.navigate(View::Home)
    }

    pub fn switch_auth_mode(&self) -> View {
        let session = self.session.current();
        self.route(|router| router.switch_auth_mode(session.as_ref()))
    }

    pub fn shows_admin_shortcut(&self) -> bool {
        self.router()
            .shows_admin_shortcut(self.session.current().as_ref())
    }

    /// The editor, available only while the admin view is shown
    pub fn admin_editor(&self) -> Option<&AdminEditor> {
        (self.current_view() == View::Admin).then_some(&self.editor)
    }

    /// Submit the auth form; on success the identity becomes the session
    pub async fn submit_auth(
        &self,
        mode: AuthMode,
        form: &AuthForm,
    ) -> std::result::Result<User, AuthError> {
        let user = match self.auth.submit(mode, form).await {
            Ok(user) => user,
            Err(e) => {
                self.log(LogEvent::new(EventKind::AuthFailed).with_error(e.kind()));
                return Err(e);
            }
        };

        self.session.establish(user.clone())?;
        self.log(LogEvent::new(match mode {
            AuthMode::Signup => EventKind::SignupSucceeded,
            AuthMode::Login => EventKind::LoginSucceeded,
        }));
        self.reevaluate_view();
        Ok(user)
    }

    /// End the session and return to the public page
    pub fn logout(&self) -> Result<View> {
        self.session.clear()?;
        self.log(LogEvent::new(EventKind::Logout));
        Ok(self.navigate(View::Home))
    }

    /// Read-only projection for the public page
    pub fn public_page(&self) -> PublicPage {
        PublicPage::from_content(&self.content.get())
    }

    pub fn log_command(&self, command: &str) {
        self.log(LogEvent::new(EventKind::CommandExecuted).with_command(command));
    }

    fn reevaluate_view(&self) -> View {
        let session = self.session.current();
        self.route(|router| router.reevaluate(session.as_ref()))
    }

    /// Run a router change and react to the view it lands on
    fn route<F>(&self, change: F) -> View
    where
        F: FnOnce(&mut ViewRouter) -> View,
    {
        let (before, after) = {
            let mut router = self.router();
            let before = router.current();
            (before, change(&mut router))
        };

        if before == View::Admin && after != View::Admin {
            let cancelled = self.editor.close();
            if cancelled > 0 {
                tracing::debug!(cancelled, "closed admin with pending uploads");
            }
        }
        if before != after {
            self.log(LogEvent::new(EventKind::ViewChanged).with_view(after.as_str()));
            self.save_view(after);
        }
        after
    }

    fn restore_view(&self) {
        let saved = match self.storage.get_json::<String>(keys::VIEW) {
            Ok(saved) => saved.and_then(|v| v.parse::<View>().ok()),
            Err(e) => {
                tracing::warn!("saved view unreadable: {}", e);
                None
            }
        };
        if let Some(view) = saved {
            let session = self.session.current();
            *self.router() = ViewRouter::with_view(view, session.as_ref());
        }
    }

    fn save_view(&self, view: View) {
        if !self.persist_view {
            return;
        }
        if let Err(e) = self.storage.set_json(keys::VIEW, view.as_str()) {
            tracing::warn!("failed to save view: {}", e);
        }
    }

    fn log(&self, event: LogEvent) {
        if let Some(logger) = &self.logger {
            if let Err(e) = logger.log(event) {
                tracing::debug!("event log write failed: {}", e);
            }
        }
    }

    fn router(&self) -> MutexGuard<'_, ViewRouter> {
        self.router.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Directory holding the JSON file store
pub fn store_dir(aura_dir: &Path) -> PathBuf {
    aura_dir.join("store")
}
