use super::retry::RetryPolicy;
use crate::domain::group::SignedGroup;
use crate::domain::outcome::Outcome;
use crate::domain::payment::PaymentRequest;
use crate::domain::ports::LedgerBox;
use futures::StreamExt;
use futures::stream;
use tracing::{debug, info, warn};

/// Lifecycle of one group's submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Pending,
    Submitted,
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionConfig {
    /// Rounds to wait for confirmation before giving up.
    pub max_rounds: u64,
    /// Groups in flight at once; 1 submits strictly one after another.
    pub concurrency: usize,
    pub retry: RetryPolicy,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            max_rounds: 4,
            concurrency: 8,
            retry: RetryPolicy::default(),
        }
    }
}

/// Submits signed groups to the ledger and tracks them to confirmation.
pub struct SubmissionCoordinator {
    ledger: LedgerBox,
    config: SubmissionConfig,
}

impl SubmissionCoordinator {
    pub fn new(ledger: LedgerBox, config: SubmissionConfig) -> Self {
        Self { ledger, config }
    }

    /// Submits one group as an atomic unit and waits for it to confirm.
    ///
    /// Never fails: ledger errors become a failed [`Outcome`].
    pub async fn submit(&self, request: PaymentRequest, group: SignedGroup) -> Outcome {
        let mut state = SubmissionState::Pending;
        debug!(handle = %request.handle, ?state, transactions = group.len(), "Submitting group");

        let tx_id = match self
            .config
            .retry
            .run("submit", || self.ledger.submit(&group))
            .await
        {
            Ok(tx_id) => tx_id,
            Err(err) => {
                state = SubmissionState::Failed;
                warn!(handle = %request.handle, ?state, error = %err, "Submission rejected");
                return Outcome::failed(request, None, err.to_string());
            }
        };

        state = SubmissionState::Submitted;
        debug!(handle = %request.handle, ?state, %tx_id, "Awaiting confirmation");

        match self
            .ledger
            .wait_for_confirmation(&tx_id, self.config.max_rounds)
            .await
        {
            Ok(round) => {
                state = SubmissionState::Confirmed;
                info!(handle = %request.handle, ?state, %tx_id, round, "Payment confirmed");
                Outcome::confirmed(request, tx_id, round)
            }
            Err(err) => {
                state = SubmissionState::Failed;
                warn!(handle = %request.handle, ?state, %tx_id, error = %err, "Payment not confirmed");
                Outcome::failed(request, Some(tx_id), err.to_string())
            }
        }
    }

    /// Submits every group, at most `concurrency` at a time, and waits for all of them.
    ///
    /// Outcomes are returned in completion order.
    pub async fn submit_all(&self, batch: Vec<(PaymentRequest, SignedGroup)>) -> Vec<Outcome> {
        stream::iter(batch)
            .map(|(request, group)| self.submit(request, group))
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await
    }
}
