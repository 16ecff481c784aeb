//! Prometheus request metrics.
//!
//! Counts every response by method and status and observes latency by
//! method. The collectors live in `fleet-telemetry` and are scraped from
//! `/metrics`.

use axum::{body::Body, http::Request, response::Response};
use fleet_telemetry::{HTTP_LATENCY, HTTP_REQUESTS};
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};

/// Metrics layer
#[derive(Clone, Default)]
pub struct MetricsLayer;

impl MetricsLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsService { inner }
    }
}

/// Metrics service
#[derive(Clone)]
pub struct MetricsService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for MetricsService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();
        let method = req.method().as_str().to_string();
        let started = Instant::now();

        Box::pin(async move {
            let result = inner.call(req).await;
            if let Ok(response) = &result {
                RequestTimer { method, started }.finish(response.status().as_u16());
            }
            result
        })
    }
}

/// Latency measurement for one request.
struct RequestTimer {
    method: String,
    started: Instant,
}

impl RequestTimer {
    fn finish(self, status: u16) {
        HTTP_REQUESTS
            .with_label_values(&[self.method.as_str(), &status.to_string()])
            .inc();
        HTTP_LATENCY
            .with_label_values(&[self.method.as_str()])
            .observe(self.started.elapsed().as_secs_f64());
    }
}
