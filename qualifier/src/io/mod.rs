//! Side-effecting helpers: configuration files, request input, and the ledger
//! backends that would reach the network.

pub mod config;
pub mod ledger;
pub mod requests;
