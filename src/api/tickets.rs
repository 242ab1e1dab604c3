//! Ticket dashboard endpoint handler.

use crate::api::{AppState, TicketsResponse};
use crate::tickets::load_sample_tickets;
use axum::{extract::State, Json};
use std::sync::Arc;

/// GET /api/tickets - Sample tickets and the tickets escalated so far.
///
/// A missing or malformed sample file is reported in `error`, never as a
/// failed request.
pub async fn handle(State(state): State<Arc<AppState>>) -> Json<TicketsResponse> {
    let sample = load_sample_tickets(&state.config.tickets.sample_path);

    Json(TicketsResponse {
        tickets: sample.tickets,
        created: state.tickets.list(),
        error: sample.error,
    })
}
