//! Session store - who is logged in
//!
//! The session is a full copy of the identity record, password included.
//! This mirrors the browser build and is a known exposure: anything that
//! can read storage can read the logged-in user's password.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::result::Result;
use crate::domain::User;
use crate::ports::{keys, KeyValueStore, KeyValueStoreExt};

pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    current: Mutex<Option<User>>,
}

impl SessionStore {
    /// Restore the saved session, if any
    ///
    /// An unreadable session is dropped rather than failing startup.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let current = match storage.get_json::<User>(keys::CURRENT_USER) {
            Ok(user) => user.map(User::normalized),
            Err(e) => {
                tracing::warn!("saved session unreadable, starting logged out: {}", e);
                None
            }
        };
        Self {
            storage,
            current: Mutex::new(current),
        }
    }

    pub fn current(&self) -> Option<User> {
        self.lock().clone()
    }

    pub fn is_admin(&self) -> bool {
        self.lock().as_ref().is_some_and(User::is_admin)
    }

    /// Persist `user` as the session, then make it current
    ///
    /// If the write fails the previous session stays in place.
    pub fn establish(&self, user: User) -> Result<()> {
        let user = user.normalized();
        let mut current = self.lock();
        self.storage.set_json(keys::CURRENT_USER, &user)?;
        *current = Some(user);
        Ok(())
    }

    /// Remove the session from storage, then end it
    pub fn clear(&self) -> Result<()> {
        let mut current = self.lock();
        self.storage.remove(keys::CURRENT_USER)?;
        *current = None;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Option<User>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}
