use once_cell::sync::Lazy;
use prometheus::{
    opts, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Registry,
    TextEncoder,
};

macro_rules! counter_vec {
    ($name:expr, $help:expr, $labels:expr) => {
        Lazy::new(|| IntCounterVec::new(opts!($name, $help), $labels).unwrap())
    };
}
macro_rules! histogram_vec {
    ($name:expr, $help:expr, $labels:expr) => {
        Lazy::new(|| {
            HistogramVec::new(HistogramOpts::new($name, $help).buckets(LATENCY_BUCKETS.to_vec()), $labels)
                .unwrap()
        })
    };
}
macro_rules! counter {
    ($name:expr, $help:expr) => {
        Lazy::new(|| IntCounter::new($name, $help).unwrap())
    };
}
macro_rules! gauge {
    ($name:expr, $help:expr) => {
        Lazy::new(|| IntGauge::new($name, $help).unwrap())
    };
}

const LATENCY_BUCKETS: [f64; 11] = [
    0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

// ── HTTP ────────────────────────────────────────────────────────────────────
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> =
    counter_vec!("http_requests_total", "Total HTTP requests", &["method", "path", "status"]);
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> =
    histogram_vec!("http_request_duration_seconds", "HTTP request latency", &["method", "path"]);
pub static CORS_REJECTIONS: Lazy<IntCounter> =
    counter!("cors_rejections_total", "Requests refused because of their Origin header");

// ── Movies ──────────────────────────────────────────────────────────────────
pub static CATALOG_SIZE: Lazy<IntGauge> = gauge!("catalog_size", "Movies currently in the catalog");
pub static MOVIES_CREATED: Lazy<IntCounter> = counter!("created_total", "Movies created");
pub static MOVIES_UPDATED: Lazy<IntCounter> = counter!("updated_total", "Movies updated");
pub static MOVIES_DELETED: Lazy<IntCounter> = counter!("deleted_total", "Movies deleted");
pub static VALIDATION_FAILURES: Lazy<IntCounterVec> = counter_vec!(
    "validation_failures_total",
    "Field violations reported to clients",
    &["code"]
);

pub fn register_all(registry: &Registry) -> prometheus::Result<()> {
    registry.register(Box::new(HTTP_REQUESTS_TOTAL.clone()))?;
    registry.register(Box::new(HTTP_REQUEST_DURATION.clone()))?;
    registry.register(Box::new(CORS_REJECTIONS.clone()))?;
    registry.register(Box::new(CATALOG_SIZE.clone()))?;
    registry.register(Box::new(MOVIES_CREATED.clone()))?;
    registry.register(Box::new(MOVIES_UPDATED.clone()))?;
    registry.register(Box::new(MOVIES_DELETED.clone()))?;
    registry.register(Box::new(VALIDATION_FAILURES.clone()))?;
    Ok(())
}

/// Fresh registry with every metric registered under the `movies` namespace
pub fn new_registry() -> prometheus::Result<Registry> {
    let registry = Registry::new_custom(Some("movies".into()), None)?;
    register_all(&registry)?;
    Ok(registry)
}

pub fn observe_http(method: &str, path: &str, status: u16, elapsed_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[method, path])
        .observe(elapsed_secs);
}

pub fn gather_metrics(registry: &Registry) -> String {
    let encoder = TextEncoder::new();
    let families = registry.gather();
    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&families, &mut buffer) {
        tracing::error!(error = %err, "failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        let registry = new_registry().unwrap();
        MOVIES_CREATED.inc();
        observe_http("GET", "/movies", 200, 0.002);

        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"movies_created_total".to_string()));
        assert!(names.contains(&"movies_http_requests_total".to_string()));
    }

    #[test]
    fn test_gather_metrics_is_text_format() {
        let registry = new_registry().unwrap();
        CATALOG_SIZE.set(3);
        let text = gather_metrics(&registry);
        assert!(text.contains("# TYPE movies_catalog_size gauge"));
    }
}
