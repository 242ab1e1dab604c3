//! Ticket dashboard configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketsConfig {
    /// JSON file with sample tickets shown on the dashboard
    pub sample_path: PathBuf,
}

impl Default for TicketsConfig {
    fn default() -> Self {
        Self {
            sample_path: PathBuf::from("data/sample_tickets.json"),
        }
    }
}
