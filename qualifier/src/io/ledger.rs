//! Ledger abstraction behind the four contract operations.
//!
//! The [`Ledger`] trait decouples the engine from where the contract actually
//! runs. [`SimulatedLedger`] evaluates everything in-process against a
//! [`Registry`]; [`RemoteLedger`] stands in for the real network contract call
//! and currently refuses every request.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use tracing::{debug, instrument, warn};

use crate::core::predicates::{all_compliant, meets_threshold};
use crate::core::registry::Registry;
use crate::core::types::{ComplianceRequest, DecimalInt, Method, ThresholdRequest, VendorId};
use crate::io::config::{BackendKind, QualifierConfig};

/// Registry state after a record call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordReceipt {
    pub newly_recorded: bool,
    pub registry_size: usize,
}

/// Backend that answers the four contract operations.
///
/// Implementations must be safe to share across threads: the pure evaluations
/// need no synchronization, and the record/lookup pair must see a consistent
/// registry.
pub trait Ledger: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    fn evaluate_threshold(&self, request: &ThresholdRequest) -> Result<bool>;

    fn evaluate_compliance(&self, request: &ComplianceRequest) -> Result<bool>;

    fn record_qualification(&self, vendor_id: &VendorId) -> Result<RecordReceipt>;

    /// Membership test. Negative ids are never recorded, so they answer `false`.
    fn is_qualified(&self, vendor_id: &DecimalInt) -> Result<bool>;
}

impl<L: Ledger + ?Sized> Ledger for Box<L> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn evaluate_threshold(&self, request: &ThresholdRequest) -> Result<bool> {
        (**self).evaluate_threshold(request)
    }

    fn evaluate_compliance(&self, request: &ComplianceRequest) -> Result<bool> {
        (**self).evaluate_compliance(request)
    }

    fn record_qualification(&self, vendor_id: &VendorId) -> Result<RecordReceipt> {
        (**self).record_qualification(vendor_id)
    }

    fn is_qualified(&self, vendor_id: &DecimalInt) -> Result<bool> {
        (**self).is_qualified(vendor_id)
    }
}

/// In-process ledger backed by a shared [`Registry`].
#[derive(Debug, Clone)]
pub struct SimulatedLedger {
    registry: Arc<Registry>,
}

impl SimulatedLedger {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }
}

impl Ledger for SimulatedLedger {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn evaluate_threshold(&self, request: &ThresholdRequest) -> Result<bool> {
        Ok(meets_threshold(request.vendor_score, request.minimum_threshold))
    }

    fn evaluate_compliance(&self, request: &ComplianceRequest) -> Result<bool> {
        Ok(all_compliant(request))
    }

    #[instrument(skip_all, fields(vendor_id = %vendor_id))]
    fn record_qualification(&self, vendor_id: &VendorId) -> Result<RecordReceipt> {
        let insertion = self.registry.insert(vendor_id.clone())?;
        debug!(
            newly_recorded = insertion.newly_recorded,
            registry_size = insertion.size,
            "registry updated"
        );
        Ok(RecordReceipt {
            newly_recorded: insertion.newly_recorded,
            registry_size: insertion.size,
        })
    }

    fn is_qualified(&self, vendor_id: &DecimalInt) -> Result<bool> {
        match vendor_id.to_vendor_id() {
            Some(id) => self.registry.contains(&id),
            None => Ok(false),
        }
    }
}

/// Placeholder for the real contract call over the network.
///
/// Every operation fails with a descriptive error so that a misconfigured
/// deployment produces error envelopes instead of simulated answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLedger {
    endpoint: String,
}

impl RemoteLedger {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    fn unavailable<T>(&self, method: Method) -> Result<T> {
        warn!(endpoint = %self.endpoint, %method, "remote ledger call attempted");
        Err(anyhow!("remote contract calls are not implemented")
            .context(format!("{} via remote ledger {}", method, self.endpoint)))
    }
}

impl Ledger for RemoteLedger {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn evaluate_threshold(&self, _request: &ThresholdRequest) -> Result<bool> {
        self.unavailable(Method::EvaluateThreshold)
    }

    fn evaluate_compliance(&self, _request: &ComplianceRequest) -> Result<bool> {
        self.unavailable(Method::EvaluateCompliance)
    }

    fn record_qualification(&self, _vendor_id: &VendorId) -> Result<RecordReceipt> {
        self.unavailable(Method::RecordQualification)
    }

    fn is_qualified(&self, _vendor_id: &DecimalInt) -> Result<bool> {
        self.unavailable(Method::IsQualified)
    }
}

/// Build the ledger selected by `config`. The registry is only used by the
/// simulated backend.
pub fn ledger_from_config(config: &QualifierConfig, registry: Arc<Registry>) -> Box<dyn Ledger> {
    match config.backend {
        BackendKind::Simulated => Box::new(SimulatedLedger::new(registry)),
        BackendKind::Remote => Box::new(RemoteLedger::new(config.remote.endpoint.clone())),
    }
}
