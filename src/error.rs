use thiserror::Error;

pub type Result<T, E = PayoutError> = std::result::Result<T, E>;

/// Errors that abort the batch before any payment is processed.
#[derive(Error, Debug)]
pub enum PayoutError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Key error: {0}")]
    KeyError(#[from] KeyError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum KeyError {
    #[error("mnemonic must have 25 words, found {0}")]
    WordCount(usize),
    #[error("unknown mnemonic word: {0}")]
    UnknownWord(String),
    #[error("mnemonic checksum mismatch")]
    Checksum,
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// The naming service could not produce a transaction group for a handle.
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("request for {handle} failed: {message}")]
    Transport { handle: String, message: String },
    #[error("resolver returned {status} for {handle}: {message}")]
    Status {
        handle: String,
        status: u16,
        message: String,
    },
    #[error("malformed resolver response for {handle}: {message}")]
    Malformed { handle: String, message: String },
}

impl ResolutionError {
    pub fn handle(&self) -> &str {
        match self {
            Self::Transport { handle, .. }
            | Self::Status { handle, .. }
            | Self::Malformed { handle, .. } => handle,
        }
    }

    /// Transport failures, throttling and server errors may succeed on a later attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Malformed { .. } => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum SigningError {
    #[error("transaction group is empty")]
    EmptyGroup,
    #[error("transaction {index} could not be decoded: {message}")]
    Decode { index: usize, message: String },
    #[error("signed transaction could not be encoded: {0}")]
    Encode(String),
}

/// Errors reported by, or while talking to, the ledger node.
///
/// `Rejected` displays the node's message verbatim so it can be reported as-is.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("ledger node unreachable: {0}")]
    Transport(String),
    #[error("{0}")]
    Rejected(String),
    #[error("Transaction rejected: {0}")]
    PoolError(String),
    #[error("Transaction not confirmed after {0} rounds")]
    NotConfirmed(u64),
    #[error("malformed ledger response: {0}")]
    Malformed(String),
}

impl LedgerError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[derive(Error, Debug)]
pub enum ReportWriteError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write report: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_transience() {
        let transport = ResolutionError::Transport {
            handle: "a.algo".into(),
            message: "connection reset".into(),
        };
        let throttled = ResolutionError::Status {
            handle: "a.algo".into(),
            status: 429,
            message: String::new(),
        };
        let not_found = ResolutionError::Status {
            handle: "a.algo".into(),
            status: 404,
            message: String::new(),
        };
        assert!(transport.is_transient());
        assert!(throttled.is_transient());
        assert!(!not_found.is_transient());
        assert_eq!(not_found.handle(), "a.algo");
    }

    #[test]
    fn test_rejected_displays_node_message() {
        let err = LedgerError::Rejected("overspend".into());
        assert_eq!(err.to_string(), "overspend");
    }
}
