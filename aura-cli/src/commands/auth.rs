//! Auth commands - signup, login, logout, whoami

use anyhow::Result;
use aura_core::services::{AuthForm, AuthMode};
use aura_core::{AuraContext, OperationResult, User, View};
use colored::Colorize;
use dialoguer::{Input, Password};

use super::{get_context, runtime};
use crate::output::{self, spinner};

pub struct SignupArgs {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub governorate: Option<String>,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub json: bool,
}

fn prompt(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new().with_prompt(label).interact_text()?),
    }
}

fn prompt_password(value: Option<String>) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Password::new().with_prompt("Security pin").interact()?),
    }
}

pub fn run_signup(args: SignupArgs) -> Result<()> {
    let form = AuthForm {
        full_name: prompt(args.full_name, "Full name")?,
        phone: prompt(args.phone, "Phone")?,
        governorate: prompt(args.governorate, "Governorate")?,
        whatsapp: prompt(args.whatsapp, "WhatsApp")?,
        email: prompt(args.email, "Email")?,
        password: prompt_password(args.password)?,
    };
    submit(AuthMode::Signup, &form, args.json)
}

pub fn run_login(email: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let form = AuthForm::login(prompt(email, "Email")?, prompt_password(password)?);
    submit(AuthMode::Login, &form, json)
}

/// Identity as printed: never echo the stored password
fn public_identity(mut user: User) -> User {
    user.password = None;
    user
}

/// Show the auth form for `mode`; the guards refuse it while logged in
fn enter_auth_view(ctx: &AuraContext, mode: AuthMode) -> Result<()> {
    let target = match mode {
        AuthMode::Login => View::Login,
        AuthMode::Signup => View::Signup,
    };
    if ctx.navigate(target) != target {
        anyhow::bail!("Already logged in; run 'aura logout' first");
    }
    Ok(())
}

fn submit(mode: AuthMode, form: &AuthForm, json: bool) -> Result<()> {
    let ctx = get_context(mode.as_str())?;
    enter_auth_view(&ctx, mode)?;

    let waiting = (!json).then(|| spinner("AUTHENTICATING..."));
    let result = runtime()?.block_on(ctx.submit_auth(mode, form));
    if let Some(waiting) = waiting {
        waiting.finish_and_clear();
    }

    if json {
        let succeeded = result.is_ok();
        let envelope: OperationResult<User> = result.map(public_identity).into();
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        if !succeeded {
            std::process::exit(1);
        }
        return Ok(());
    }

    match result {
        Ok(user) => {
            output::success(&format!("Welcome, {} ({})", user.full_name, user.role.as_str()));
            output::info(&format!("View: {}", ctx.current_view()));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn run_logout() -> Result<()> {
    let ctx = get_context("logout")?;
    if ctx.session.current().is_none() {
        output::warning("Not logged in.");
        return Ok(());
    }
    let view = ctx.logout()?;
    output::success("Logged out.");
    output::info(&format!("View: {}", view));
    Ok(())
}

pub fn run_whoami(json: bool) -> Result<()> {
    let ctx = get_context("whoami")?;
    let current = ctx.session.current();

    if json {
        println!("{}", serde_json::to_string_pretty(&current.map(public_identity))?);
        return Ok(());
    }

    match current {
        Some(user) => {
            println!("{} <{}>", user.full_name.bold(), user.email);
            println!("Role: {}", user.role.as_str());
        }
        None => println!("Not logged in."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use aura_core::adapters::MemoryStore;
    use aura_core::config::{Config, StorageBackend, Timings};

    fn context() -> AuraContext {
        let config = Config {
            storage: StorageBackend::Json,
            timings: Timings::instant(),
        };
        AuraContext::with_storage(config, Arc::new(MemoryStore::new()), None)
    }

    #[test]
    fn test_auth_view_opens_when_logged_out() {
        let ctx = context();
        enter_auth_view(&ctx, AuthMode::Signup).unwrap();
        assert_eq!(ctx.current_view(), View::Signup);
        enter_auth_view(&ctx, AuthMode::Login).unwrap();
        assert_eq!(ctx.current_view(), View::Login);
    }

    #[tokio::test]
    async fn test_auth_refused_while_logged_in() {
        let ctx = context();
        let form = AuthForm {
            full_name: "First".to_string(),
            email: "first@example.com".to_string(),
            password: "pin".to_string(),
            ..AuthForm::default()
        };
        enter_auth_view(&ctx, AuthMode::Signup).unwrap();
        ctx.submit_auth(AuthMode::Signup, &form).await.unwrap();

        let err = enter_auth_view(&ctx, AuthMode::Signup).unwrap_err();
        assert!(err.to_string().contains("aura logout"));
        assert!(enter_auth_view(&ctx, AuthMode::Login).is_err());
        assert_eq!(ctx.current_view(), View::Home);
        assert_eq!(ctx.registry.count().unwrap(), 1);
        assert_eq!(
            ctx.session.current().map(|u| u.email),
            Some("first@example.com".to_string())
        );
    }
}
