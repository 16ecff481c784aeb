//! Prometheus metrics for the fleet services.
//!
//! All metrics follow the naming convention: `fleet_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, HistogramOpts, HistogramVec, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // HTTP METRICS
    // =========================================================================

    /// Requests served by the gateway
    pub static ref HTTP_REQUESTS: CounterVec = CounterVec::new(
        Opts::new("fleet_http_requests_total", "Total HTTP requests served"),
        &["method", "status"]
    ).expect("metric creation failed");

    /// Request latency
    pub static ref HTTP_LATENCY: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "fleet_http_request_duration_seconds",
            "Time spent handling HTTP requests"
        ).buckets(exponential_buckets(0.0005, 2.0, 14).expect("valid buckets")),
        &["method"]
    ).expect("metric creation failed");

    // =========================================================================
    // LIFECYCLE METRICS
    // =========================================================================

    /// Batteries registered
    pub static ref BATTERIES_CREATED: Counter = Counter::new(
        "fleet_batteries_created_total",
        "Total number of batteries registered"
    ).expect("metric creation failed");

    /// Shipment status changes by target status
    pub static ref SHIPMENT_TRANSITIONS: CounterVec = CounterVec::new(
        Opts::new("fleet_shipment_transitions_total", "Total shipment status changes"),
        &["status"]
    ).expect("metric creation failed");

    /// Environmental readings by kind and verdict
    pub static ref ENVIRONMENTAL_READINGS: CounterVec = CounterVec::new(
        Opts::new("fleet_environmental_readings_total", "Total environmental readings logged"),
        &["kind", "alert"]  // kind: temperature/humidity/shock, alert: true/false
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; already registered collectors are skipped.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(HTTP_REQUESTS.clone()),
        Box::new(HTTP_LATENCY.clone()),
        Box::new(BATTERIES_CREATED.clone()),
        Box::new(SHIPMENT_TRANSITIONS.clone()),
        Box::new(ENVIRONMENTAL_READINGS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format, registering them first
/// if telemetry was never initialised.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    register_metrics()?;
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
