use crate::application::retry::RetryPolicy;
use crate::application::submitter::SubmissionConfig;
use crate::infrastructure::nfd::DEFAULT_API_URL;
use std::time::Duration;

/// Asset paid out when none is configured.
pub const DEFAULT_ASSET_ID: u64 = 1285225688;

/// Runtime settings for one payout batch.
#[derive(Debug, Clone, PartialEq)]
pub struct PayoutConfig {
    /// Base URL of the naming service.
    pub api_url: String,
    pub asset_id: u64,
    /// Minimum spacing between resolver calls across the whole batch.
    pub min_interval: Duration,
    /// Per-request timeout for resolver and ledger HTTP calls.
    pub request_timeout: Duration,
    pub submission: SubmissionConfig,
    pub resolver_retry: RetryPolicy,
}

impl Default for PayoutConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            asset_id: DEFAULT_ASSET_ID,
            min_interval: Duration::from_millis(200), // ~300 calls per minute
            request_timeout: Duration::from_secs(10),
            submission: SubmissionConfig::default(),
            resolver_retry: RetryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PayoutConfig::default();
        assert_eq!(config.asset_id, 1285225688);
        assert_eq!(config.min_interval, Duration::from_millis(200));
        assert_eq!(config.submission.max_rounds, 4);
        assert_eq!(config.submission.retry.max_retries, 0);
        assert_eq!(config.resolver_retry.max_retries, 0);
    }
}
