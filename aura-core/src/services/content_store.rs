//! Content store - owns the site document
//!
//! The document is only ever replaced whole: `apply` clones the current
//! document, lets the patch change the clone, swaps it in and then tells
//! every observer. Persistence is one such observer ([`PersistContent`]).

use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::WebsiteContent;
use crate::ports::{keys, KeyValueStore, KeyValueStoreExt};
use crate::services::logging::{EventKind, LogEvent, LoggingService};

/// Receives every new document right after it replaces the old one
pub trait ContentObserver: Send + Sync {
    fn content_changed(&self, content: &WebsiteContent);
}

/// Holds the current `WebsiteContent` and its observers
pub struct ContentStore {
    document: Mutex<WebsiteContent>,
    observers: Mutex<Vec<Arc<dyn ContentObserver>>>,
    /// Serializes replace+notify so observers see documents in swap order
    writer: Mutex<()>,
}

impl ContentStore {
    pub fn new(initial: WebsiteContent) -> Self {
        Self {
            document: Mutex::new(initial),
            observers: Mutex::new(Vec::new()),
            writer: Mutex::new(()),
        }
    }

    /// Load the saved document, falling back to the built-in defaults
    ///
    /// A document that no longer parses is treated like a missing one.
    pub fn load(storage: &dyn KeyValueStore) -> Self {
        let initial = match storage.get_json::<WebsiteContent>(keys::CONTENT) {
            Ok(Some(content)) => content,
            Ok(None) => WebsiteContent::default(),
            Err(e) => {
                tracing::warn!("saved content unreadable, using defaults: {}", e);
                WebsiteContent::default()
            }
        };
        Self::new(initial)
    }

    /// Snapshot of the current document
    pub fn get(&self) -> WebsiteContent {
        self.document().clone()
    }

    /// Replace the document with a patched copy and notify observers
    ///
    /// Returns the new document. Observers may read the store but must not
    /// call `apply` themselves.
    pub fn apply<F>(&self, patch: F) -> WebsiteContent
    where
        F: FnOnce(&mut WebsiteContent),
    {
        let _writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let next = {
            let mut document = self.document();
            let mut next = document.clone();
            patch(&mut next);
            *document = next.clone();
            next
        };

        let observers = self.observers().clone();
        for observer in observers {
            observer.content_changed(&next);
        }
        next
    }

    /// Register an observer for future changes
    pub fn subscribe(&self, observer: Arc<dyn ContentObserver>) {
        self.observers().push(observer);
    }

    // A panicking patch can only poison the lock before the swap, so the
    // guarded document is still whole.
    fn document(&self) -> MutexGuard<'_, WebsiteContent> {
        self.document.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn observers(&self) -> MutexGuard<'_, Vec<Arc<dyn ContentObserver>>> {
        self.observers.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Writes the full document to storage on every change
///
/// Write failures are logged and otherwise dropped: edits always succeed
/// in memory even when the disk does not keep up.
pub struct PersistContent {
    storage: Arc<dyn KeyValueStore>,
    logger: Option<Arc<LoggingService>>,
}

impl PersistContent {
    pub fn new(storage: Arc<dyn KeyValueStore>, logger: Option<Arc<LoggingService>>) -> Self {
        Self { storage, logger }
    }
}

impl ContentObserver for PersistContent {
    fn content_changed(&self, content: &WebsiteContent) {
        if let Err(e) = self.storage.set_json(keys::CONTENT, content) {
            tracing::error!("failed to persist content: {}", e);
            if let Some(logger) = &self.logger {
                let _ = logger.log(LogEvent::new(EventKind::PersistFailed).with_error(e.to_string()));
            }
        }
    }
}
