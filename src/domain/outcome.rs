use super::payment::PaymentRequest;

/// How a submitted group ended up on the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Confirmed { tx_id: String, confirmed_round: u64 },
    Failed { tx_id: Option<String>, error: String },
}

/// The result of submitting one payment's signed group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub request: PaymentRequest,
    pub settlement: Settlement,
}

impl Outcome {
    pub fn confirmed(request: PaymentRequest, tx_id: String, confirmed_round: u64) -> Self {
        Self {
            request,
            settlement: Settlement::Confirmed {
                tx_id,
                confirmed_round,
            },
        }
    }

    pub fn failed(request: PaymentRequest, tx_id: Option<String>, error: String) -> Self {
        Self {
            request,
            settlement: Settlement::Failed { tx_id, error },
        }
    }

    pub fn success(&self) -> bool {
        matches!(self.settlement, Settlement::Confirmed { .. })
    }

    pub fn tx_id(&self) -> Option<&str> {
        match &self.settlement {
            Settlement::Confirmed { tx_id, .. } => Some(tx_id),
            Settlement::Failed { tx_id, .. } => tx_id.as_deref(),
        }
    }

    pub fn confirmed_round(&self) -> Option<u64> {
        match self.settlement {
            Settlement::Confirmed {
                confirmed_round, ..
            } => Some(confirmed_round),
            Settlement::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.settlement {
            Settlement::Confirmed { .. } => None,
            Settlement::Failed { error, .. } => Some(error),
        }
    }
}

/// A payment that never reached submission because resolution or signing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedPayment {
    pub request: PaymentRequest,
    pub reason: String,
}

/// Splits outcomes into `(confirmed, failed)`, keeping the order they arrived in.
pub fn partition(outcomes: Vec<Outcome>) -> (Vec<Outcome>, Vec<Outcome>) {
    outcomes.into_iter().partition(Outcome::success)
}
