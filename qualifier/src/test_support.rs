//! Test-only helpers: a frozen clock, a failing ledger, and engine builders.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use chrono::{DateTime, TimeZone, Utc};

use crate::clock::Clock;
use crate::core::registry::Registry;
use crate::core::types::{ComplianceRequest, DecimalInt, ThresholdRequest, VendorId};
use crate::engine::QualificationEngine;
use crate::io::ledger::{Ledger, RecordReceipt, SimulatedLedger};

/// Clock frozen at a single instant (2024-03-09T14:05:00Z by default).
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub at: DateTime<Utc>,
}

impl Default for FixedClock {
    fn default() -> Self {
        Self {
            at: Utc
                .with_ymd_and_hms(2024, 3, 9, 14, 5, 0)
                .single()
                .expect("valid fixed instant"),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}

/// Ledger whose every call fails with `ledger offline`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingLedger;

impl Ledger for FailingLedger {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn evaluate_threshold(&self, _request: &ThresholdRequest) -> Result<bool> {
        Err(anyhow!("ledger offline"))
    }

    fn evaluate_compliance(&self, _request: &ComplianceRequest) -> Result<bool> {
        Err(anyhow!("ledger offline"))
    }

    fn record_qualification(&self, _vendor_id: &VendorId) -> Result<RecordReceipt> {
        Err(anyhow!("ledger offline"))
    }

    fn is_qualified(&self, _vendor_id: &DecimalInt) -> Result<bool> {
        Err(anyhow!("ledger offline"))
    }
}

/// Engine over a fresh simulated registry, plus a handle to that registry.
pub fn simulated_engine() -> (QualificationEngine<SimulatedLedger, FixedClock>, Arc<Registry>) {
    let registry = Arc::new(Registry::new());
    let engine = engine_over(Arc::clone(&registry));
    (engine, registry)
}

/// Engine over an existing registry, for tests that share one across engines.
pub fn engine_over(registry: Arc<Registry>) -> QualificationEngine<SimulatedLedger, FixedClock> {
    QualificationEngine::with_clock(
        SimulatedLedger::new(registry),
        FixedClock::default(),
        "testnet",
    )
}
