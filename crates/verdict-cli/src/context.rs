use std::sync::Arc;

use anyhow::Context;
use verdict_config::VerdictConfig;
use verdict_db::service::VerdictService;
use verdict_engine::{Aggregator, AggregatorConfig};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: Arc<VerdictService>,
    pub aggregator: Aggregator,
    pub config: VerdictConfig,
}

impl AppContext {
    /// Open the configured database and start the aggregator over it.
    pub async fn init(config: VerdictConfig) -> anyhow::Result<Self> {
        let service = VerdictService::new_local_with(
            &config.database.path,
            config.database.busy_timeout(),
        )
        .await
        .with_context(|| format!("failed to open database at {}", config.database.path))?;
        let service = Arc::new(service);

        let aggregator = Aggregator::new(
            Arc::clone(&service),
            AggregatorConfig::from(&config.aggregation),
        );

        Ok(Self {
            service,
            aggregator,
            config,
        })
    }

    /// Effective list limit: command-line flag, then `general.default_limit`.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.config.general.default_limit
    }
}

#[cfg(test)]
pub mod test_support {
    use verdict_config::VerdictConfig;

    use super::AppContext;

    /// Context over an in-memory database.
    pub async fn memory_context() -> AppContext {
        let mut config = VerdictConfig::default();
        config.database.path = ":memory:".into();
        AppContext::init(config).await.expect("in-memory context")
    }
}
