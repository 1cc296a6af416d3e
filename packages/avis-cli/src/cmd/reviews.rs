//! Review commands: search and add

use anyhow::{bail, Result};
use avis_core::{AddReviewStatus, NewReviewDraft, Orchestrator, SearchStatus};

use crate::render;

pub async fn search(app: &Orchestrator, phone: &str) -> Result<()> {
    let status = app.search(phone).await;
    let state = app.search_state();
    match status {
        SearchStatus::Empty | SearchStatus::Populated => {
            render::search(&state);
            Ok(())
        }
        _ => bail!(state
            .message
            .unwrap_or_else(|| "Search failed".to_string())),
    }
}

pub async fn add(app: &Orchestrator, draft: NewReviewDraft) -> Result<()> {
    let status = app.add_review(draft).await;
    let state = app.add_review_state();
    match status {
        AddReviewStatus::Success => {
            render::add_review(&state);
            Ok(())
        }
        _ => bail!(state
            .message
            .unwrap_or_else(|| "Could not add review".to_string())),
    }
}
