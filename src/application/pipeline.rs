use super::signer::GroupSigner;
use super::submitter::SubmissionCoordinator;
use crate::domain::outcome::{DroppedPayment, Outcome, partition};
use crate::domain::payment::PaymentRequest;
use crate::domain::ports::{FailureSink, ResolverBox};
use crate::error::ReportWriteError;
use tracing::{error, info};

/// What happened to every payment in a batch.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub confirmed: Vec<Outcome>,
    pub failed: Vec<Outcome>,
    /// Payments that never reached submission.
    pub dropped: Vec<DroppedPayment>,
}

/// Resolve, sign, submit, partition.
///
/// Resolution runs one payment at a time through the throttled resolver;
/// submission then runs with the coordinator's concurrency limit.
pub struct PayoutPipeline {
    resolver: ResolverBox,
    signer: GroupSigner,
    coordinator: SubmissionCoordinator,
}

impl PayoutPipeline {
    pub fn new(
        resolver: ResolverBox,
        signer: GroupSigner,
        coordinator: SubmissionCoordinator,
    ) -> Self {
        Self {
            resolver,
            signer,
            coordinator,
        }
    }

    pub async fn run(&self, requests: Vec<PaymentRequest>) -> BatchSummary {
        let total = requests.len();
        let mut ready = Vec::with_capacity(total);
        let mut dropped = Vec::new();

        for request in requests {
            let group = match self.resolver.fetch_group(&request).await {
                Ok(group) => group,
                Err(err) => {
                    error!(handle = %request.handle, error = %err, "Error fetching transactions");
                    dropped.push(DroppedPayment {
                        request,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            match self.signer.sign(&group) {
                Ok(signed) => ready.push((request, signed)),
                Err(err) => {
                    error!(handle = %request.handle, error = %err, "Error signing transactions");
                    dropped.push(DroppedPayment {
                        request,
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            total,
            ready = ready.len(),
            dropped = dropped.len(),
            "Resolution finished"
        );

        let outcomes = self.coordinator.submit_all(ready).await;
        let (confirmed, failed) = partition(outcomes);

        info!(
            confirmed = confirmed.len(),
            failed = failed.len(),
            dropped = dropped.len(),
            "Batch finished"
        );

        BatchSummary {
            confirmed,
            failed,
            dropped,
        }
    }
}

/// Hands the failed outcomes to `sink`, only if there are any.
///
/// Returns whether the sink was written to.
pub fn report(failed: &[Outcome], sink: &mut dyn FailureSink) -> Result<bool, ReportWriteError> {
    if failed.is_empty() {
        return Ok(false);
    }
    sink.write_failures(failed)?;
    Ok(true)
}
