use super::retry::RetryPolicy;
use super::throttle::ThrottleGate;
use crate::domain::group::TransactionGroup;
use crate::domain::payment::PaymentRequest;
use crate::domain::ports::{Resolver, ResolverBox};
use crate::error::ResolutionError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Routes every resolver call through one shared [`ThrottleGate`].
///
/// Each attempt, retries included, waits for the gate before it is issued.
pub struct ThrottledResolver {
    inner: ResolverBox,
    gate: Arc<ThrottleGate>,
    retry: RetryPolicy,
}

impl ThrottledResolver {
    pub fn new(inner: ResolverBox, gate: Arc<ThrottleGate>) -> Self {
        Self {
            inner,
            gate,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl Resolver for ThrottledResolver {
    async fn fetch_group(
        &self,
        request: &PaymentRequest,
    ) -> Result<TransactionGroup, ResolutionError> {
        self.retry
            .run("resolve", || async {
                self.gate.acquire().await;
                debug!(handle = %request.handle, "Resolving handle");
                self.inner.fetch_group(request).await
            })
            .await
    }
}
