//! Application layer: the stages of the payout pipeline.
//!
//! Resolution is serialized through a shared [`throttle::ThrottleGate`];
//! submission fans out with a bounded number of groups in flight.

pub mod pipeline;
pub mod resolver;
pub mod retry;
pub mod signer;
pub mod submitter;
pub mod throttle;
