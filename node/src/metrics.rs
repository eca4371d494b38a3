//! # Prometheus Metrics
//!
//! Operational metrics for the token node, scraped at `/metrics` on the
//! metrics port.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] so they
//! do not collide with any default global registry consumers.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Holds all Prometheus metric handles for the node.
#[derive(Clone)]
pub struct NodeMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Calls that succeeded, by method.
    pub calls_accepted_total: IntCounterVec,
    /// Calls that were rejected, by error code.
    pub calls_rejected_total: IntCounterVec,
    /// 1 while the token is paused.
    pub paused: IntGauge,
    /// Number of events in the token's log.
    pub events_recorded: IntGauge,
    /// Time spent executing a call, lock wait included.
    pub call_latency_seconds: Histogram,
}

impl NodeMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Self {
        let registry = Registry::new_custom(Some("bastion".into()), None)
            .expect("failed to create prometheus registry");

        let calls_accepted_total = IntCounterVec::new(
            Opts::new("calls_accepted_total", "Token calls that succeeded"),
            &["method"],
        )
        .expect("metric creation");
        registry
            .register(Box::new(calls_accepted_total.clone()))
            .expect("metric registration");

        let calls_rejected_total = IntCounterVec::new(
            Opts::new("calls_rejected_total", "Token calls rejected by a guard"),
            &["code"],
        )
        .expect("metric creation");
        registry
            .register(Box::new(calls_rejected_total.clone()))
            .expect("metric registration");

        let paused = IntGauge::new("paused", "Whether the token is paused (1) or active (0)")
            .expect("metric creation");
        registry
            .register(Box::new(paused.clone()))
            .expect("metric registration");

        let events_recorded =
            IntGauge::new("events_recorded", "Number of events in the token's log")
                .expect("metric creation");
        registry
            .register(Box::new(events_recorded.clone()))
            .expect("metric registration");

        let call_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "call_latency_seconds",
                "Time to execute a token call in seconds",
            )
            .buckets(vec![
                0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05, 0.1,
            ]),
        )
        .expect("metric creation");
        registry
            .register(Box::new(call_latency_seconds.clone()))
            .expect("metric registration");

        Self {
            registry,
            calls_accepted_total,
            calls_rejected_total,
            paused,
            events_recorded,
            call_latency_seconds,
        }
    }

    /// Refreshes the gauges from the token's current state.
    pub fn observe_state(&self, paused: bool, event_count: usize) {
        self.paused.set(i64::from(paused));
        self.events_recorded
            .set(i64::try_from(event_count).unwrap_or(i64::MAX));
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer).expect("prometheus output is valid utf-8"))
    }
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<NodeMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}
