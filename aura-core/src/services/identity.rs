//! Identity registry - the append-only list of signed-up users

use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::{normalize_email, User};
use crate::ports::{keys, KeyValueStore};

/// Registered identities, read from and written to storage whole
///
/// Nothing here enforces email uniqueness; signup checks it before
/// appending.
pub struct IdentityRegistry {
    storage: Arc<dyn KeyValueStore>,
}

impl IdentityRegistry {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Every registered identity, emails normalized
    ///
    /// An unreadable list is treated as empty.
    pub fn all(&self) -> Result<Vec<User>> {
        let raw = self.storage.get(keys::REGISTERED_USERS)?;
        Ok(parse_users(raw.as_deref()))
    }

    /// First identity registered under `email` (any case or padding)
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = normalize_email(email);
        Ok(self.all()?.into_iter().find(|u| u.email == email))
    }

    pub fn contains_email(&self, email: &str) -> Result<bool> {
        Ok(self.find_by_email(email)?.is_some())
    }

    /// Identity whose email and password both match
    pub fn find_by_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        let email = normalize_email(email);
        Ok(self
            .all()?
            .into_iter()
            .find(|u| u.email == email && u.password.as_deref() == Some(password)))
    }

    /// Append an identity and persist the full list
    pub fn append(&self, user: User) -> Result<()> {
        let user = user.normalized();
        self.storage.update(keys::REGISTERED_USERS, &mut |raw| {
            let mut users = parse_users(raw.as_deref());
            users.push(user.clone());
            Ok(serde_json::to_string(&users)?)
        })
    }

    /// Append `user` unless its email is already registered
    ///
    /// The check and the append happen under one storage lock, so two
    /// racing signups for the same email cannot both succeed. Returns
    /// whether the identity was added.
    pub fn register(&self, user: User) -> Result<bool> {
        let user = user.normalized();
        let mut added = false;
        self.storage.update(keys::REGISTERED_USERS, &mut |raw| {
            let mut users = parse_users(raw.as_deref());
            added = !users.iter().any(|u| u.email == user.email);
            if added {
                users.push(user.clone());
            }
            Ok(serde_json::to_string(&users)?)
        })?;
        Ok(added)
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.all()?.len())
    }
}

fn parse_users(raw: Option<&str>) -> Vec<User> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<User>>(raw) {
        Ok(users) => users.into_iter().map(User::normalized).collect(),
        Err(e) => {
            tracing::warn!("registered identities unreadable, treating as empty: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;

    fn registry() -> (Arc<dyn KeyValueStore>, IdentityRegistry) {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        (Arc::clone(&storage), IdentityRegistry::new(storage))
    }

    fn user(id: &str, email: &str, password: &str) -> User {
        User::new(id, "Name", "", "", "", email, Some(password.to_string()))
    }

    #[test]
    fn test_append_keeps_signup_order() {
        let (_, registry) = registry();
        registry.append(user("1", "a@x.com", "p")).unwrap();
        registry.append(user("2", "b@x.com", "p")).unwrap();

        let ids: Vec<String> = registry.all().unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_lookup_normalizes_stored_and_queried_emails() {
        let (storage, registry) = registry();
        storage
            .set(
                keys::REGISTERED_USERS,
                r#"[{"id":"1","fullName":"","phone":"","governorate":"","whatsapp":"","email":" Mixed@Case.io ","password":"pw","role":"user"}]"#,
            )
            .unwrap();

        assert!(registry.contains_email("mixed@case.io").unwrap());
        assert!(registry.find_by_credentials("MIXED@case.io ", "pw").unwrap().is_some());
        assert!(registry.find_by_credentials("mixed@case.io", "PW").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_list_reads_as_empty() {
        let (storage, registry) = registry();
        storage.set(keys::REGISTERED_USERS, "not json").unwrap();
        assert_eq!(registry.count().unwrap(), 0);
    }

    #[test]
    fn test_register_rejects_taken_email() {
        let (_, registry) = registry();
        assert!(registry.register(user("1", "a@x.com", "p")).unwrap());
        assert!(!registry.register(user("2", " A@X.com ", "q")).unwrap());
        assert_eq!(registry.count().unwrap(), 1);
    }
}
