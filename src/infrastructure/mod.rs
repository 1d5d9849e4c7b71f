//! HTTP adapters for the resolver and ledger ports.

pub mod algod;
pub mod nfd;
