//! Ticket storage.
//!
//! [`TicketStore`] keeps tickets created by the pipeline when a query is
//! escalated. It is in-memory and lock-free for readers; tickets do not
//! survive a restart. [`load_sample_tickets`] feeds the dashboard with a
//! static example backlog.

pub mod sample;

pub use sample::{load_sample_tickets, SampleTickets};

use crate::classify::Classification;
use crate::escalation::EscalationDecision;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

const SUFFIX_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A ticket routed to human support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: String,
    pub query: String,
    pub classification: Classification,
    /// Text returned to the customer when the ticket was opened
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation_info: Option<EscalationDecision>,
    pub created_at: DateTime<Utc>,
}

/// Thread-safe in-memory ticket store.
#[derive(Debug, Default)]
pub struct TicketStore {
    tickets: DashMap<String, Ticket>,
    counter: AtomicU64,
}

impl TicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate an id of the form `TICK-{unix_millis}-{counter:04}-{SUFFIX}`.
    ///
    /// The counter is per store and starts at 1; the suffix is four random
    /// characters from `[A-Z0-9]`.
    pub fn next_ticket_id(&self) -> String {
        let counter = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let millis = Utc::now().timestamp_millis();
        let random = uuid::Uuid::new_v4();
        let suffix = id_suffix(&random.as_bytes()[..4]);

        format!("TICK-{}-{:04}-{}", millis, counter, suffix)
    }

    /// Store a new ticket and return its id.
    pub fn create_ticket(
        &self,
        query: &str,
        classification: Classification,
        response: &str,
        escalation_info: Option<EscalationDecision>,
    ) -> String {
        let ticket_id = self.next_ticket_id();
        let ticket = Ticket {
            ticket_id: ticket_id.clone(),
            query: query.to_string(),
            classification,
            response: response.to_string(),
            escalation_info,
            created_at: Utc::now(),
        };

        self.tickets.insert(ticket_id.clone(), ticket);
        tracing::info!(ticket_id = %ticket_id, topic = %classification.topic, "ticket created");
        ticket_id
    }

    pub fn get(&self, ticket_id: &str) -> Option<Ticket> {
        self.tickets.get(ticket_id).map(|t| t.value().clone())
    }

    /// All tickets, newest first.
    pub fn list(&self) -> Vec<Ticket> {
        let mut tickets: Vec<Ticket> = self.tickets.iter().map(|t| t.value().clone()).collect();
        tickets.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.ticket_id.cmp(&a.ticket_id))
        });
        tickets
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}

/// Map random bytes onto uppercase letters and digits, one character each.
fn id_suffix(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| char::from(SUFFIX_ALPHABET[usize::from(*b) % SUFFIX_ALPHABET.len()]))
        .collect()
}
