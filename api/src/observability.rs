use anyhow::Result;
use prometheus::Registry;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::metrics;

const DEFAULT_LOG_FILTER: &str = "movies_api=debug,tower_http=debug";

pub struct Observability {
    pub registry: Registry,
}

impl Observability {
    /// Install the global tracing subscriber and build the metrics registry.
    ///
    /// `RUST_LOG` overrides the default filter; `LOG_FORMAT=json` switches to
    /// JSON lines.
    pub fn init() -> Result<Self> {
        let registry = metrics::new_registry()?;

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
        let json = std::env::var("LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let subscriber = tracing_subscriber::registry().with(env_filter);
        if json {
            subscriber
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        } else {
            subscriber.with(tracing_subscriber::fmt::layer()).try_init()?;
        }

        tracing::info!(json_logs = json, "Observability stack initialized (tracing + Prometheus)");
        Ok(Self { registry })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }
}
