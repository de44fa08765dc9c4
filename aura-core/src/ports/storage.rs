//! Storage port - local key/value persistence
//!
//! Mirrors browser local storage: string keys mapped to JSON-encoded
//! string values, read and written whole.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::result::Result;

/// Keys used for persisted state
pub mod keys {
    /// The full content document
    pub const CONTENT: &str = "aura_portfolio_content_v4";

    /// The logged-in identity record
    pub const CURRENT_USER: &str = "aura_current_user";

    /// Every identity ever registered, in signup order
    pub const REGISTERED_USERS: &str = "aura_registered_users";

    /// Router view, kept between CLI invocations
    pub const VIEW: &str = "aura_view";
}

/// Key/value storage abstraction
///
/// Implementations (adapters) provide the actual persistence. A `set`
/// followed by a `get` of the same key must observe the new value.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value for a key
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write the raw value for a key, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Read-modify-write a key while holding the backend's write lock
    ///
    /// `f` receives the current raw value and returns the new one. No other
    /// writer can change the key between the read and the write.
    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Result<String>,
    ) -> Result<()>;

    /// Remove a key (no-op if absent)
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently stored
    fn keys(&self) -> Result<Vec<String>>;

    /// Short backend name for status output
    fn backend_name(&self) -> &'static str;
}

/// JSON helpers on top of the raw string interface
pub trait KeyValueStoreExt: KeyValueStore {
    /// Read and decode a JSON value
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encode and write a JSON value
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}
