//! Interactive menu, shown when no subcommand is given.
//!
//! The menu offered depends on the application mode: signed-out users can
//! only log in or register, signed-in users get the review actions.

use anyhow::Result;
use avis_core::{AppMode, NewReviewDraft, Orchestrator, WorkflowEvent};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use tokio::sync::broadcast::error::TryRecvError;

use crate::{cmd, render};

#[derive(Clone, Copy)]
enum Action {
    Login,
    Register,
    Search,
    AddReview,
    Logout,
    Quit,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::Login => "Log in",
            Action::Register => "Register",
            Action::Search => "Search a phone number",
            Action::AddReview => "Add a review",
            Action::Logout => "Log out",
            Action::Quit => "Quit",
        }
    }

    fn menu(mode: AppMode) -> &'static [Action] {
        match mode {
            AppMode::Unauthenticated => &[Action::Login, Action::Register, Action::Quit],
            AppMode::Authenticated => &[
                Action::Search,
                Action::AddReview,
                Action::Logout,
                Action::Quit,
            ],
        }
    }
}

pub async fn run(app: &Orchestrator) -> Result<()> {
    let theme = ColorfulTheme::default();
    let mut events = app.subscribe_events();

    render::print_header("avis");
    if let Some(session) = app.session() {
        render::print_info(&format!("Signed in as {}", session.user.email));
    }

    loop {
        println!();
        let actions = Action::menu(app.mode());
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();

        let choice = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        let result = match actions[choice] {
            Action::Login => cmd::auth::login(app, None).await,
            Action::Register => register(app, &theme).await,
            Action::Search => search(app, &theme).await,
            Action::AddReview => add_review(app, &theme).await,
            Action::Logout => cmd::auth::logout(app),
            Action::Quit => break,
        };

        if let Err(e) = result {
            render::print_error(&format!("{:#}", e));
        }
        report_expired_session(&mut events);
    }

    Ok(())
}

async fn register(app: &Orchestrator, theme: &ColorfulTheme) -> Result<()> {
    let then_login = Confirm::with_theme(theme)
        .with_prompt("Sign in after registering?")
        .default(true)
        .interact()?;
    cmd::auth::register(app, None, then_login).await
}

async fn search(app: &Orchestrator, theme: &ColorfulTheme) -> Result<()> {
    let mut input = Input::<String>::with_theme(theme).with_prompt("Phone number");
    if let Some(phone) = app.search_state().phone {
        input = input.default(phone);
    }
    let phone = input.interact_text()?;
    cmd::reviews::search(app, &phone).await
}

async fn add_review(app: &Orchestrator, theme: &ColorfulTheme) -> Result<()> {
    let mut phone_input = Input::<String>::with_theme(theme).with_prompt("Phone number");
    if let Some(phone) = app.search_state().phone {
        phone_input = phone_input.default(phone);
    }
    let client_phone = phone_input.interact_text()?;

    let is_positive = Select::with_theme(theme)
        .with_prompt("Experience")
        .items(&["Positive", "Negative"])
        .default(0)
        .interact()?
        == 0;

    let message: String = Input::with_theme(theme)
        .with_prompt("Comment (optional)")
        .allow_empty(true)
        .interact_text()?;

    let phone = client_phone.trim().to_string();
    let draft = NewReviewDraft {
        client_phone,
        is_positive,
        message,
    };
    cmd::reviews::add(app, draft).await?;

    // The search view refreshes itself when it shows the same number
    let state = app.search_state();
    if state.phone.as_deref() == Some(phone.as_str()) {
        render::search(&state);
    }
    Ok(())
}

fn report_expired_session(events: &mut tokio::sync::broadcast::Receiver<WorkflowEvent>) {
    loop {
        match events.try_recv() {
            Ok(WorkflowEvent::SessionInvalidated { .. }) => {
                render::print_info("Your session has expired, please log in again.");
            }
            Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}
