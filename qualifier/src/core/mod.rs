//! Deterministic, pure logic behind the qualification contract.
//!
//! Core modules perform no I/O. The registry is the only stateful piece and is
//! owned by whoever constructs it, never by a global.

pub mod predicates;
pub mod registry;
pub mod types;
