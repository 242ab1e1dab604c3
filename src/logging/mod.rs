//! Structured logging helpers
//!
//! Filter construction for `tracing-subscriber`, request correlation ids and
//! privacy-safe previews of customer queries.

pub mod fields;

pub use fields::{generate_request_id, query_preview};

use crate::config::LoggingConfig;

/// Build the `EnvFilter` directive string for a logging configuration.
///
/// The base level comes first, followed by one `triage::<component>=<level>`
/// directive per configured component in name order.
///
/// ```
/// use triage::config::LoggingConfig;
/// use triage::logging::build_filter_directives;
///
/// let mut config = LoggingConfig::default();
/// config.component_levels.insert("escalation".to_string(), "debug".to_string());
///
/// assert_eq!(build_filter_directives(&config), "info,triage::escalation=debug");
/// ```
pub fn build_filter_directives(config: &LoggingConfig) -> String {
    std::iter::once(config.level.clone())
        .chain(
            config
                .component_levels
                .iter()
                .map(|(component, level)| format!("triage::{}={}", component, level)),
        )
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives_base_level_only() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(build_filter_directives(&config), "warn");
    }

    #[test]
    fn test_filter_directives_components_in_name_order() {
        let mut config = LoggingConfig::default();
        config
            .component_levels
            .insert("pipeline".to_string(), "trace".to_string());
        config
            .component_levels
            .insert("api".to_string(), "debug".to_string());

        assert_eq!(
            build_filter_directives(&config),
            "info,triage::api=debug,triage::pipeline=trace"
        );
    }
}
