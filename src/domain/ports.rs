use super::group::{SignedGroup, TransactionGroup};
use super::outcome::Outcome;
use super::payment::PaymentRequest;
use crate::error::{LedgerError, ReportWriteError, ResolutionError};
use async_trait::async_trait;

/// Turns a payment request into the unsigned transactions that settle it.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn fetch_group(
        &self,
        request: &PaymentRequest,
    ) -> Result<TransactionGroup, ResolutionError>;
}

/// The ledger node that accepts signed groups and reports confirmation.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Submits the whole group in one call and returns its transaction id.
    async fn submit(&self, group: &SignedGroup) -> Result<String, LedgerError>;

    /// Waits at most `max_rounds` rounds and returns the confirmed round.
    async fn wait_for_confirmation(
        &self,
        tx_id: &str,
        max_rounds: u64,
    ) -> Result<u64, LedgerError>;
}

/// Destination for the failed-payments report.
pub trait FailureSink {
    fn write_failures(&mut self, failed: &[Outcome]) -> Result<(), ReportWriteError>;
}

pub type ResolverBox = Box<dyn Resolver>;
pub type LedgerBox = Box<dyn Ledger>;
