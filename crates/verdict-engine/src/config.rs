use std::time::Duration;

use verdict_config::AggregationConfig;
use verdict_db::retry::RetryConfig;

/// Runtime settings for an [`Aggregator`](crate::Aggregator).
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// A worker with an empty queue retires after this long.
    pub idle_timeout: Duration,
    /// Backoff applied to failed recomputations.
    pub retry: RetryConfig,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self::from(&AggregationConfig::default())
    }
}

impl From<&AggregationConfig> for AggregatorConfig {
    fn from(config: &AggregationConfig) -> Self {
        Self {
            idle_timeout: config.idle_timeout(),
            retry: RetryConfig {
                max_attempts: config.retry_max_attempts,
                base_delay: config.retry_base_delay(),
                max_delay: config.retry_max_delay(),
            },
        }
    }
}
