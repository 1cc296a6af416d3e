//! Account commands: login, register, logout, whoami

use anyhow::{bail, Context, Result};
use avis_core::{AuthStatus, Orchestrator};
use dialoguer::{Input, Password};

use crate::render;

fn prompt_email(email: Option<String>) -> Result<String> {
    match email {
        Some(email) => Ok(email),
        None => Input::new()
            .with_prompt("Email")
            .interact_text()
            .context("Failed to read email"),
    }
}

fn prompt_password() -> Result<String> {
    Password::new()
        .with_prompt("Password")
        .interact()
        .context("Failed to read password")
}

fn finish(app: &Orchestrator, status: AuthStatus) -> Result<()> {
    let state = app.auth_state();
    match status {
        AuthStatus::Succeeded => {
            render::auth(&state);
            Ok(())
        }
        _ => bail!(state
            .message
            .unwrap_or_else(|| "Authentication failed".to_string())),
    }
}

pub async fn login(app: &Orchestrator, email: Option<String>) -> Result<()> {
    let email = prompt_email(email)?;
    let password = prompt_password()?;

    let status = app.login(&email, &password).await;
    finish(app, status)?;
    if let Some(session) = app.session() {
        render::print_success(&format!("Signed in as {}", session.user.email));
    }
    Ok(())
}

pub async fn register(app: &Orchestrator, email: Option<String>, then_login: bool) -> Result<()> {
    let email = prompt_email(email)?;
    let password = prompt_password()?;

    let status = if then_login {
        app.register_and_login(&email, &password).await
    } else {
        app.register(&email, &password).await
    };
    finish(app, status)?;
    if then_login {
        render::print_success(&format!("Registered and signed in as {}", email.trim()));
    }
    Ok(())
}

pub fn logout(app: &Orchestrator) -> Result<()> {
    app.logout();
    render::print_success("Signed out");
    Ok(())
}

pub fn whoami(app: &Orchestrator) -> Result<()> {
    match app.session() {
        Some(session) => {
            println!("{} (id {})", session.user.email, session.user.id);
            Ok(())
        }
        None => bail!("Not signed in"),
    }
}
