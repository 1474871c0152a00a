//! The qualification engine: four contract operations behind one envelope.
//!
//! The engine never fails outright. Whatever the ledger returns is sealed into
//! an [`Envelope`]: answers become `result`/`detail`, errors become `error`.
//! Nothing here retries or escalates.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock, format_timestamp};
use crate::core::predicates::compliance_breakdown;
use crate::core::types::{
    ComplianceRequest, Method, RecordRequest, Request, StatusRequest, ThresholdRequest,
};
use crate::envelope::{
    CircuitInfo, ComplianceDetail, ComplianceEnvelope, Envelope, Outcome, Privacy, RecordDetail,
    RecordEnvelope, Response, StatusDetail, StatusEnvelope, StatusLabel, ThresholdDetail,
    ThresholdEnvelope,
};
use crate::io::ledger::Ledger;
use crate::proof::threshold_binding;

/// Evaluates contract calls against a [`Ledger`] and stamps each envelope
/// with the configured network id and the clock's current instant.
pub struct QualificationEngine<L, C = SystemClock> {
    ledger: L,
    clock: C,
    network_id: String,
}

impl<L: Ledger> QualificationEngine<L, SystemClock> {
    pub fn new(ledger: L, network_id: impl Into<String>) -> Self {
        Self::with_clock(ledger, SystemClock, network_id)
    }
}

impl<L: Ledger, C: Clock> QualificationEngine<L, C> {
    pub fn with_clock(ledger: L, clock: C, network_id: impl Into<String>) -> Self {
        Self {
            ledger,
            clock,
            network_id: network_id.into(),
        }
    }

    pub fn network_id(&self) -> &str {
        &self.network_id
    }

    /// `vendorScore >= minimumThreshold`, independent of the salt.
    ///
    /// The raw score appears only in the echoed params: it is not logged and
    /// not included in the detail or the proof binding.
    pub fn evaluate_threshold(&self, request: ThresholdRequest) -> ThresholdEnvelope {
        let outcome = self.ledger.evaluate_threshold(&request).map(|passed| {
            let detail = ThresholdDetail {
                info: CircuitInfo {
                    circuit: Method::EvaluateThreshold.circuit(),
                    input: format!(
                        "score=<private>, threshold={}",
                        request.minimum_threshold
                    ),
                    output: passed.to_string(),
                    privacy: Privacy::FullZeroKnowledge,
                    status: if passed {
                        StatusLabel::MeetsThreshold
                    } else {
                        StatusLabel::BelowThreshold
                    },
                },
                proof_binding: threshold_binding(
                    &self.network_id,
                    request.minimum_threshold,
                    &request.salt,
                    passed,
                ),
            };
            (Some(passed), detail)
        });
        self.seal(Method::EvaluateThreshold, request, outcome)
    }

    /// Logical AND of the three compliance flags.
    pub fn evaluate_compliance(&self, request: ComplianceRequest) -> ComplianceEnvelope {
        let outcome = self.ledger.evaluate_compliance(&request).map(|compliant| {
            let breakdown = compliance_breakdown(&request);
            let input = breakdown
                .iter()
                .map(|check| format!("{}={}", check.flag, check.passed))
                .collect::<Vec<_>>()
                .join(", ");
            let detail = ComplianceDetail {
                info: CircuitInfo {
                    circuit: Method::EvaluateCompliance.circuit(),
                    input,
                    output: compliant.to_string(),
                    privacy: Privacy::SelectiveDisclosure,
                    status: if compliant {
                        StatusLabel::Compliant
                    } else {
                        StatusLabel::NonCompliant
                    },
                },
                breakdown,
            };
            (Some(compliant), detail)
        });
        self.seal(Method::EvaluateCompliance, request, outcome)
    }

    /// Insert the vendor into the registry. Recording a present id again
    /// succeeds and leaves the registry unchanged.
    pub fn record_qualification(&self, request: RecordRequest) -> RecordEnvelope {
        let outcome = self
            .ledger
            .record_qualification(&request.vendor_id)
            .map(|receipt| {
                let (status, ledger_update) = if receipt.newly_recorded {
                    (
                        StatusLabel::Recorded,
                        format!(
                            "vendor {} added to the qualified registry",
                            request.vendor_id
                        ),
                    )
                } else {
                    (
                        StatusLabel::AlreadyRecorded,
                        format!(
                            "vendor {} already qualified; registry unchanged",
                            request.vendor_id
                        ),
                    )
                };
                info!(
                    newly_recorded = receipt.newly_recorded,
                    registry_size = receipt.registry_size,
                    "qualification recorded"
                );
                let detail = RecordDetail {
                    info: CircuitInfo {
                        circuit: Method::RecordQualification.circuit(),
                        input: format!("vendorId={}", request.vendor_id),
                        output: format!("registrySize={}", receipt.registry_size),
                        privacy: Privacy::PublicLedger,
                        status,
                    },
                    registry_size: receipt.registry_size,
                    newly_recorded: receipt.newly_recorded,
                    ledger_update,
                };
                (None, detail)
            });
        self.seal(Method::RecordQualification, request, outcome)
    }

    /// Registry membership at the instant of the call. Unknown and negative
    /// ids answer `false`; that is a successful answer, not an error.
    pub fn is_qualified(&self, request: StatusRequest) -> StatusEnvelope {
        let outcome = self.ledger.is_qualified(&request.vendor_id).map(|qualified| {
            let detail = StatusDetail {
                info: CircuitInfo {
                    circuit: Method::IsQualified.circuit(),
                    input: format!("vendorId={}", request.vendor_id),
                    output: qualified.to_string(),
                    privacy: Privacy::PublicBoolean,
                    status: if qualified {
                        StatusLabel::Qualified
                    } else {
                        StatusLabel::NotQualified
                    },
                },
            };
            (Some(qualified), detail)
        });
        self.seal(Method::IsQualified, request, outcome)
    }

    /// Route a request to its operation.
    pub fn dispatch(&self, request: Request) -> Response {
        match request {
            Request::EvaluateThreshold(inner) => {
                Response::Threshold(self.evaluate_threshold(inner))
            }
            Request::EvaluateCompliance(inner) => {
                Response::Compliance(self.evaluate_compliance(inner))
            }
            Request::RecordQualification(inner) => {
                Response::Record(self.record_qualification(inner))
            }
            Request::IsQualified(inner) => Response::Status(self.is_qualified(inner)),
        }
    }

    fn seal<P, D>(
        &self,
        method: Method,
        params: P,
        outcome: Result<(Option<bool>, D)>,
    ) -> Envelope<P, D> {
        let outcome = match outcome {
            Ok((result, detail)) => {
                debug!(%method, ledger = self.ledger.name(), ?result, "call answered");
                Outcome::Success { result, detail }
            }
            Err(err) => {
                let error = format!("{err:#}");
                warn!(%method, ledger = self.ledger.name(), %error, "call failed");
                Outcome::Failure { error }
            }
        };
        Envelope {
            method,
            network: self.network_id.clone(),
            params,
            outcome,
            timestamp: format_timestamp(self.clock.now()),
        }
    }
}
