//! View router - decides which surface is shown
//!
//! Guards run after every view change and every session change, until the
//! view stops moving. A non-admin can therefore never stay on `Admin`, and a
//! fresh login never stays on the auth form.

use crate::domain::{User, View};

#[derive(Debug, Clone, Default)]
pub struct ViewRouter {
    view: View,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at a previously saved view (guards still apply)
    pub fn with_view(view: View, session: Option<&User>) -> Self {
        let mut router = Self { view };
        router.reevaluate(session);
        router
    }

    pub fn current(&self) -> View {
        self.view
    }

    /// Explicit navigation, followed by the guards
    pub fn navigate(&mut self, target: View, session: Option<&User>) -> View {
        self.view = target;
        self.reevaluate(session)
    }

    /// Re-run the guards, e.g. after the session changed
    pub fn reevaluate(&mut self, session: Option<&User>) -> View {
        loop {
            let next = guard(self.view, session);
            if next == self.view {
                return next;
            }
            tracing::debug!(from = %self.view, to = %next, "view redirected");
            self.view = next;
        }
    }

    /// Flip between the login and signup forms
    pub fn switch_auth_mode(&mut self, session: Option<&User>) -> View {
        let target = match self.view {
            View::Login => View::Signup,
            View::Signup => View::Login,
            other => other,
        };
        self.navigate(target, session)
    }

    /// Whether the floating "open admin" shortcut is shown
    pub fn shows_admin_shortcut(&self, session: Option<&User>) -> bool {
        self.view == View::Home && session.is_some_and(User::is_admin)
    }
}

/// One guard step
fn guard(view: View, session: Option<&User>) -> View {
    match (view, session) {
        (View::Admin, None) => View::Login,
        (View::Admin, Some(user)) if !user.is_admin() => View::Home,
        (view, Some(user)) if view.is_auth() && user.is_admin() => View::Admin,
        (view, Some(_)) if view.is_auth() => View::Home,
        (view, _) => view,
    }
}
