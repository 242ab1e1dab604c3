//! # Metrics Collection Module
//!
//! Request and escalation metrics with Prometheus export on `GET /metrics`.
//!
//! ## Metrics Tracked
//!
//! **Counters:**
//! - `triage_requests_total{endpoint, status}` - API requests
//! - `triage_escalations_total{topic}` - Escalated tickets by topic
//!
//! **Histograms:**
//! - `triage_escalation_score{outcome}` - Score distribution per decision
//! - `triage_request_duration_seconds{endpoint}` - Handler latency


// Re-export PrometheusBuilder for test compatibility
pub use metrics_exporter_prometheus::PrometheusBuilder;

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Central coordinator for metrics recording and rendering.
pub struct MetricsCollector {
    /// Server startup time for uptime calculation
    start_time: Instant,
    /// Thread-safe cache for sanitized Prometheus labels
    label_cache: DashMap<String, String>,
    /// Prometheus handle for rendering metrics
    prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
}

impl MetricsCollector {
    pub fn new(
        start_time: Instant,
        prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
    ) -> Self {
        Self {
            start_time,
            label_cache: DashMap::new(),
            prometheus_handle,
        }
    }

    /// Get sanitized Prometheus label (cached).
    ///
    /// Replaces characters outside `[a-zA-Z0-9_]` with underscores and
    /// prefixes a leading digit, so topic labels such as `API/SDK` become
    /// `API_SDK`.
    pub fn sanitize_label(&self, label: &str) -> String {
        if let Some(cached) = self.label_cache.get(label) {
            return cached.clone();
        }

        let mut sanitized = label
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect::<String>();

        if sanitized.is_empty() || sanitized.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            sanitized.insert(0, '_');
        }

        self.label_cache.insert(label.to_string(), sanitized.clone());
        sanitized
    }

    /// Record one escalation decision for a ticket with the given topic label.
    pub fn record_escalation(&self, topic: &str, escalated: bool, score: f64) {
        let outcome = if escalated { "escalated" } else { "answered" };
        metrics::histogram!("triage_escalation_score", "outcome" => outcome).record(score);

        if escalated {
            let topic = self.sanitize_label(topic);
            metrics::counter!("triage_escalations_total", "topic" => topic).increment(1);
        }
    }

    /// Record a finished API request.
    pub fn record_request(&self, endpoint: &'static str, status: u16, elapsed: Duration) {
        metrics::counter!(
            "triage_requests_total",
            "endpoint" => endpoint,
            "status" => status.to_string()
        )
        .increment(1);
        metrics::histogram!("triage_request_duration_seconds", "endpoint" => endpoint)
            .record(elapsed.as_secs_f64());
    }

    /// Get uptime in seconds since server startup.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Render Prometheus metrics in text format.
    pub fn render_metrics(&self) -> String {
        self.prometheus_handle.render()
    }
}

/// Initialize the Prometheus exporter with histogram buckets.
///
/// Score buckets cover the `[0, 1.7]` range escalation scores can reach;
/// duration buckets are sized for hosted-LLM round trips.
pub fn setup_metrics(
) -> Result<metrics_exporter_prometheus::PrometheusHandle, Box<dyn std::error::Error>> {
    use metrics_exporter_prometheus::Matcher;

    let score_buckets = &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.25, 1.5];
    let duration_buckets = &[0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("triage_escalation_score".to_string()),
            score_buckets,
        )?
        .set_buckets_for_metric(
            Matcher::Full("triage_request_duration_seconds".to_string()),
            duration_buckets,
        )?
        .install_recorder()?;

    Ok(handle)
}
