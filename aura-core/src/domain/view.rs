//! Top-level views

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::result::Error;

/// Which surface the site shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Home,
    Login,
    Signup,
    Admin,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::Login => "login",
            View::Signup => "signup",
            View::Admin => "admin",
        }
    }

    /// Whether this is one of the auth forms
    pub fn is_auth(&self) -> bool {
        matches!(self, View::Login | View::Signup)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "home" => Ok(View::Home),
            "login" => Ok(View::Login),
            "signup" => Ok(View::Signup),
            "admin" => Ok(View::Admin),
            other => Err(Error::validation(format!("Unknown view: {}", other))),
        }
    }
}
