//! Domain types and the ports the payout pipeline talks through.

pub mod account;
pub mod group;
pub mod outcome;
pub mod payment;
pub mod ports;
