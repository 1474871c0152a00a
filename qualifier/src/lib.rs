//! Vendor qualification engine.
//!
//! Simulates a four-operation qualification contract: a threshold check, a
//! compliance check, recording a qualified vendor, and a membership lookup.
//! Every call returns a uniform envelope. The architecture keeps a strict
//! separation:
//!
//! - **[`core`]**: Pure, deterministic logic (predicates, request types, the
//!   registry). No I/O.
//! - **[`io`]**: Configuration, request input, and ledger backends.
//!
//! [`engine`] wires a ledger and a clock into envelopes; [`batch`] runs a
//! request stream against one engine.

pub mod batch;
pub mod clock;
pub mod core;
pub mod engine;
pub mod envelope;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod proof;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
