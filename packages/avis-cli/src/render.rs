//! Terminal rendering of orchestrator state

use avis_client::Review;
use avis_core::{AddReviewState, AuthState, SearchState, SearchStatus};
use chrono::Local;
use console::style;

pub fn print_header(text: &str) {
    println!("{}", style(text).bold().cyan());
}

pub fn print_success(text: &str) {
    println!("{} {}", style("✓").green(), text);
}

pub fn print_info(text: &str) {
    println!("{}", style(text).dim());
}

pub fn print_error(text: &str) {
    eprintln!("{} {}", style("✗").red(), style(text).red());
}

/// Print a failure message if the state carries one.
pub fn print_message(message: Option<&str>) {
    if let Some(message) = message {
        print_error(message);
    }
}

pub fn auth(state: &AuthState) {
    if let Some(message) = state.message.as_deref() {
        print_info(message);
    }
}

pub fn add_review(state: &AddReviewState) {
    if let Some(message) = state.message.as_deref() {
        print_success(message);
    }
}

pub fn search(state: &SearchState) {
    match state.status {
        SearchStatus::Idle => print_info("No search yet."),
        SearchStatus::Empty => {
            let phone = state.phone.as_deref().unwrap_or_default();
            print_info(&format!("No reviews found for {}.", phone));
        }
        SearchStatus::Populated => {
            let phone = state.phone.as_deref().unwrap_or_default();
            print_header(&format!("{} review(s) for {}", state.reviews.len(), phone));
            for review in &state.reviews {
                print_review(review);
            }
        }
        _ => print_message(state.message.as_deref()),
    }
}

fn print_review(review: &Review) {
    let verdict = if review.is_positive {
        style("+ positive").green()
    } else {
        style("- negative").red()
    };
    println!();
    println!("  {}", verdict.bold());
    if let Some(message) = review.message.as_deref().filter(|m| !m.is_empty()) {
        println!("  {}", message);
    }
    println!(
        "  {}",
        style(format!(
            "by {} on {}",
            review.author_email,
            review.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        ))
        .dim()
    );
}
