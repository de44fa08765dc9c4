//! User / identity domain model

use serde::{Deserialize, Serialize};

/// The one email address granted the admin role
pub const ADMIN_EMAIL: &str = "aly575490@gmail.com";

/// Trim and lowercase an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Whether `email` (in any case or padding) is the admin address
pub fn is_admin_email(email: &str) -> bool {
    normalize_email(email) == ADMIN_EMAIL
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Role derived from an email address
    pub fn for_email(email: &str) -> Self {
        if is_admin_email(email) {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

/// A registered identity
///
/// The same record is copied into the session on login, password included.
/// That leaks the password into session storage; the session should hold a
/// non-secret reference instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub phone: String,
    pub governorate: String,
    pub whatsapp: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
}

impl User {
    /// Build an identity, normalizing the email and deriving the role from it
    pub fn new(
        id: impl Into<String>,
        full_name: impl Into<String>,
        phone: impl Into<String>,
        governorate: impl Into<String>,
        whatsapp: impl Into<String>,
        email: &str,
        password: Option<String>,
    ) -> Self {
        let email = normalize_email(email);
        let role = Role::for_email(&email);
        Self {
            id: id.into(),
            full_name: full_name.into(),
            phone: phone.into(),
            governorate: governorate.into(),
            whatsapp: whatsapp.into(),
            email,
            password,
            role,
        }
    }

    /// Re-normalize a record read from storage
    ///
    /// Storage written by hand (or by older builds) may carry a padded or
    /// mixed-case email; the role is recomputed to match.
    pub fn normalized(mut self) -> Self {
        self.email = normalize_email(&self.email);
        self.role = Role::for_email(&self.email);
        self
    }

    pub fn is_admin(&self) -> bool {
        self.email == ADMIN_EMAIL
    }
}
