//! Contact form route handler.
//!
//! `POST /contact` runs one pass of the contact state machine and renders
//! the catalog page with the contact section showing the outcome.

use axum::{Form, extract::State};
use muva_core::{BookingState, ContactForm, ContactSubmitter, FilterCriteria, SubmitDecision};
use tracing::instrument;

use super::home::{HomeTemplate, catalog_page};
use super::views::ContactView;
use crate::error::add_breadcrumb;
use crate::state::AppState;

/// Submit the contact form.
#[instrument(skip(state, form))]
pub async fn submit(State(state): State<AppState>, Form(form): Form<ContactForm>) -> HomeTemplate {
    let form_id = state
        .catalog()
        .snapshot()
        .map(|loaded| loaded.settings.formspree_id.clone())
        .unwrap_or_default();
    let mut submitter = ContactSubmitter::with_form(&form_id, form);

    let validation = match submitter.begin_submit() {
        SubmitDecision::Disabled => {
            tracing::warn!("Contact form posted but no form id is configured");
            None
        }
        SubmitDecision::InFlight => None,
        SubmitDecision::Dropped => {
            tracing::info!("Honeypot filled, dropping contact submission");
            None
        }
        SubmitDecision::Invalid(err) => Some(err.to_string()),
        SubmitDecision::Send(submission) => {
            add_breadcrumb("contact", "Submitting contact form", None);
            let delivered = match state.formspree().submit(&submission).await {
                Ok(()) => {
                    tracing::info!("Contact form delivered");
                    true
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to deliver contact form");
                    false
                }
            };
            submitter.complete(delivered);
            None
        }
    };

    catalog_page(
        &state,
        &FilterCriteria::default(),
        &BookingState::Closed,
        ContactView::new(&submitter, validation),
    )
}
