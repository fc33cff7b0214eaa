//! Prometheus metrics for vendor calls served by the mock.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use prometheus::{
    histogram_opts, opts, register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec,
    IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

/// Vendor call duration, from decoded body to encoded response.
pub static REST_CALL_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        histogram_opts!(
            "billing_mock_rest_call_duration_seconds",
            "Vendor call handling duration",
            vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]
        ),
        &["rest_call"]
    )
    .expect("Failed to register REST_CALL_DURATION")
});

/// Vendor calls by outcome (`ok` or `error`).
pub static REST_CALLS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Vendor error envelopes by code.
pub static ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Recorder behind the shared HTTP request middleware.
static HTTP_METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize all metrics. Call once at startup; later calls are no-ops.
pub fn init_metrics() {
    REST_CALLS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "billing_mock_rest_calls_total",
                "Total vendor calls by rest_call and outcome"
            ),
            &["rest_call", "outcome"]
        )
        .expect("Failed to register REST_CALLS_TOTAL")
    });

    ERRORS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "billing_mock_errors_total",
                "Total vendor error envelopes by rest_call and error_code"
            ),
            &["rest_call", "error_code"]
        )
        .expect("Failed to register ERRORS_TOTAL")
    });

    let _ = &*REST_CALL_DURATION;

    if HTTP_METRICS_HANDLE.get().is_none() {
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                let _ = HTTP_METRICS_HANDLE.set(handle);
            }
            Err(e) => tracing::warn!(error = %e, "HTTP metrics recorder not installed"),
        }
    }
}

/// Metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    let mut text = String::from_utf8_lossy(&buffer).into_owned();
    if let Some(handle) = HTTP_METRICS_HANDLE.get() {
        text.push_str(&handle.render());
    }
    text
}

pub fn record_rest_call(rest_call: &str, outcome: &str) {
    if let Some(counter) = REST_CALLS_TOTAL.get() {
        counter.with_label_values(&[rest_call, outcome]).inc();
    }
}

pub fn record_rest_call_duration(rest_call: &str, duration_secs: f64) {
    REST_CALL_DURATION
        .with_label_values(&[rest_call])
        .observe(duration_secs);
}

/// Record an error envelope for alerting.
pub fn record_error(rest_call: &str, error_code: i64) {
    if let Some(counter) = ERRORS_TOTAL.get() {
        counter
            .with_label_values(&[rest_call, &error_code.to_string()])
            .inc();
    }
}
