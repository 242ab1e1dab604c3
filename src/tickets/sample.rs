//! Example ticket backlog for the dashboard.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Loaded sample tickets. A load failure is reported in `error`, never raised.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleTickets {
    pub tickets: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SampleFile {
    Wrapped { tickets: Vec<serde_json::Value> },
    Bare(Vec<serde_json::Value>),
}

/// Read sample tickets from `{"tickets": [...]}` or a bare JSON array.
pub fn load_sample_tickets(path: &Path) -> SampleTickets {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return SampleTickets {
                tickets: Vec::new(),
                error: Some("Sample tickets file not found".to_string()),
            };
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read sample tickets");
            return SampleTickets {
                tickets: Vec::new(),
                error: Some(format!("Failed to read sample tickets: {}", e)),
            };
        }
    };

    match serde_json::from_str::<SampleFile>(&content) {
        Ok(SampleFile::Wrapped { tickets }) | Ok(SampleFile::Bare(tickets)) => SampleTickets {
            tickets,
            error: None,
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid sample tickets file");
            SampleTickets {
                tickets: Vec::new(),
                error: Some(format!("Invalid sample tickets file: {}", e)),
            }
        }
    }
}
