//! Triage - customer-support triage copilot
//!
//! Classifies support tickets, retrieves documentation, drafts answers and
//! decides through a deterministic [`escalation`] engine whether a ticket
//! needs a human agent.

pub mod agent;
pub mod api;
pub mod classify;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod escalation;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod quality;
pub mod retrieval;
pub mod tickets;
