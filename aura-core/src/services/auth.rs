//! Auth flow - mock signup and login against the identity registry
//!
//! There is no server. A submit waits out a fixed latency, then checks the
//! locally registered identities. The caller owns the session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::domain::{generate_id, is_admin_email, normalize_email, User};
use crate::services::identity::IdentityRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

impl AuthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::Login => "login",
            AuthMode::Signup => "signup",
        }
    }
}

/// Fields of the login/signup form
///
/// Login only reads `email` and `password`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub full_name: String,
    pub phone: String,
    pub governorate: String,
    pub whatsapp: String,
    pub email: String,
    pub password: String,
}

impl AuthForm {
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            ..Self::default()
        }
    }
}

/// Why a submit was rejected; `Display` is the message shown to the user
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("IDENT_EXISTS: This email is already registered in our core database.")]
    IdentityExists,

    #[error("{}", not_found_message(.admin_hint))]
    IdentityNotFound { admin_hint: bool },

    #[error("AUTH_FAILURE: Incorrect security pin for this identity.")]
    CredentialMismatch,

    #[error("BUSY: Authentication already in progress.")]
    Busy,

    #[error("STORAGE_FAULT: {0}")]
    Storage(#[from] crate::domain::result::Error),
}

fn not_found_message(admin_hint: &bool) -> &'static str {
    if *admin_hint {
        "ACCESS_DENIED: Admin identity not initialized on this device. Sign up with the admin email first."
    } else {
        "ACCESS_DENIED: Email not found. Please \"Request Access\" (Sign Up) first."
    }
}

impl AuthError {
    /// Short kind for the event log (never includes the email)
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::IdentityExists => "identity_exists",
            AuthError::IdentityNotFound { .. } => "identity_not_found",
            AuthError::CredentialMismatch => "credential_mismatch",
            AuthError::Busy => "busy",
            AuthError::Storage(_) => "storage",
        }
    }
}

/// Runs login and signup submits, one at a time
pub struct AuthFlow {
    registry: Arc<IdentityRegistry>,
    latency: Duration,
    pending: AtomicBool,
}

impl AuthFlow {
    pub fn new(registry: Arc<IdentityRegistry>, latency: Duration) -> Self {
        Self {
            registry,
            latency,
            pending: AtomicBool::new(false),
        }
    }

    /// Whether a submit is in flight (the submit control is disabled)
    pub fn is_submitting(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Submit the form in `mode`, returning the identity to log in as
    pub async fn submit(&self, mode: AuthMode, form: &AuthForm) -> Result<User, AuthError> {
        let _pending = PendingGuard::acquire(&self.pending).ok_or(AuthError::Busy)?;
        let email = normalize_email(&form.email);

        tokio::time::sleep(self.latency).await;

        match mode {
            AuthMode::Signup => self.signup(&email, form),
            AuthMode::Login => self.login(&email, &form.password),
        }
    }

    fn signup(&self, email: &str, form: &AuthForm) -> Result<User, AuthError> {
        let user = User::new(
            generate_id(),
            form.full_name.as_str(),
            form.phone.as_str(),
            form.governorate.as_str(),
            form.whatsapp.as_str(),
            email,
            Some(form.password.clone()),
        );
        if !self.registry.register(user.clone())? {
            return Err(AuthError::IdentityExists);
        }
        tracing::debug!(role = user.role.as_str(), "identity registered");
        Ok(user)
    }

    fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if let Some(user) = self.registry.find_by_credentials(email, password)? {
            return Ok(user);
        }

        if self.registry.contains_email(email)? {
            Err(AuthError::CredentialMismatch)
        } else {
            Err(AuthError::IdentityNotFound {
                admin_hint: is_admin_email(email),
            })
        }
    }
}

/// Holds the pending flag for one submit; released on every exit path,
/// including a dropped future
struct PendingGuard<'a>(&'a AtomicBool);

impl<'a> PendingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::domain::{Role, ADMIN_EMAIL};
    use crate::ports::KeyValueStore;

    fn flow() -> (Arc<IdentityRegistry>, AuthFlow) {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let registry = Arc::new(IdentityRegistry::new(storage));
        let flow = AuthFlow::new(Arc::clone(&registry), Duration::from_millis(800));
        (registry, flow)
    }

    fn signup_form(email: &str, password: &str) -> AuthForm {
        AuthForm {
            full_name: "Test User".to_string(),
            phone: "0100".to_string(),
            governorate: "Cairo".to_string(),
            whatsapp: "0100".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_signup_then_login_with_different_case() {
        let (registry, flow) = flow();

        let created = flow
            .submit(AuthMode::Signup, &signup_form(" Admin@X.com ", "1234"))
            .await
            .unwrap();
        assert_eq!(created.email, "admin@x.com");
        assert_eq!(created.role, Role::User);
        assert_eq!(registry.count().unwrap(), 1);

        let logged_in = flow
            .submit(AuthMode::Login, &AuthForm::login("admin@x.com", "1234"))
            .await
            .unwrap();
        assert_eq!(logged_in, created);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_signup_appends_nothing() {
        let (registry, flow) = flow();
        flow.submit(AuthMode::Signup, &signup_form("dup@x.com", "a"))
            .await
            .unwrap();

        let err = flow
            .submit(AuthMode::Signup, &signup_form("  DUP@x.com", "b"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::IdentityExists));
        assert_eq!(registry.count().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_failures() {
        let (_, flow) = flow();
        flow.submit(AuthMode::Signup, &signup_form("user@x.com", "right"))
            .await
            .unwrap();

        let err = flow
            .submit(AuthMode::Login, &AuthForm::login("user@x.com", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::CredentialMismatch));
        assert_eq!(
            err.to_string(),
            "AUTH_FAILURE: Incorrect security pin for this identity."
        );

        let err = flow
            .submit(AuthMode::Login, &AuthForm::login("nobody@x.com", "right"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::IdentityNotFound { admin_hint: false }));
        assert!(err.to_string().contains("Email not found"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_admin_login_before_signup_gets_hint() {
        let (_, flow) = flow();
        let err = flow
            .submit(AuthMode::Login, &AuthForm::login(ADMIN_EMAIL, "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::IdentityNotFound { admin_hint: true }));
        assert!(err.to_string().contains("Admin identity not initialized"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_admin_signup_gets_admin_role() {
        let (_, flow) = flow();
        let user = flow
            .submit(AuthMode::Signup, &signup_form("ALY575490@gmail.com", "pin"))
            .await
            .unwrap();
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submit_while_pending_is_busy() {
        let (_, flow) = flow();
        let flow = Arc::new(flow);

        let first = {
            let flow = Arc::clone(&flow);
            tokio::spawn(async move {
                flow.submit(AuthMode::Signup, &signup_form("a@x.com", "p"))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(flow.is_submitting());

        let err = flow
            .submit(AuthMode::Signup, &signup_form("b@x.com", "p"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Busy));

        first.await.unwrap().unwrap();
        assert!(!flow.is_submitting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_clears_after_failure() {
        let (_, flow) = flow();
        let _ = flow
            .submit(AuthMode::Login, &AuthForm::login("x@x.com", "p"))
            .await;
        assert!(!flow.is_submitting());
    }
}
