//! Uniform response envelope returned by every contract operation.
//!
//! Each operation has its own detail type, and [`Response`] ties them together
//! by method so callers match exhaustively instead of probing optional fields.
//! Serialized form:
//!
//! ```json
//! {"method":"isQualified","network":"testnet","params":{"vendorId":"999"},
//!  "result":true,"detail":{...},"timestamp":"2024-03-09T14:05:00.000Z"}
//! ```
//!
//! A failed call carries `error` instead of `result`/`detail`. A `false`
//! result is a successful answer, never a failure.

use serde::Serialize;

use crate::core::predicates::FlagCheck;
use crate::core::types::{
    ComplianceRequest, Method, RecordRequest, StatusRequest, ThresholdRequest,
};

/// What the envelope is allowed to reveal about the inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Privacy {
    /// Only the boolean outcome is meant to be observable.
    FullZeroKnowledge,
    /// Individual flags are shown alongside the outcome.
    SelectiveDisclosure,
    /// The registry mutation itself is public.
    PublicLedger,
    /// A yes/no answer and nothing else about the registry.
    PublicBoolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusLabel {
    MeetsThreshold,
    BelowThreshold,
    Compliant,
    NonCompliant,
    Recorded,
    AlreadyRecorded,
    Qualified,
    NotQualified,
}

/// Detail fields shared by every circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircuitInfo {
    pub circuit: &'static str,
    pub input: String,
    pub output: String,
    pub privacy: Privacy,
    pub status: StatusLabel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdDetail {
    #[serde(flatten)]
    pub info: CircuitInfo,
    /// Simulated proof digest; see [`crate::proof`].
    pub proof_binding: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceDetail {
    #[serde(flatten)]
    pub info: CircuitInfo,
    pub breakdown: Vec<FlagCheck>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDetail {
    #[serde(flatten)]
    pub info: CircuitInfo,
    pub registry_size: usize,
    pub newly_recorded: bool,
    pub ledger_update: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDetail {
    #[serde(flatten)]
    pub info: CircuitInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome<D> {
    Success {
        #[serde(skip_serializing_if = "Option::is_none")]
        result: Option<bool>,
        detail: D,
    },
    Failure {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope<P, D> {
    pub method: Method,
    /// Opaque network/contract identifier from configuration.
    pub network: String,
    pub params: P,
    #[serde(flatten)]
    pub outcome: Outcome<D>,
    pub timestamp: String,
}

impl<P, D> Envelope<P, D> {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }

    /// Boolean answer, absent on failure and for `recordQualification`.
    pub fn result(&self) -> Option<bool> {
        match &self.outcome {
            Outcome::Success { result, .. } => *result,
            Outcome::Failure { .. } => None,
        }
    }

    pub fn detail(&self) -> Option<&D> {
        match &self.outcome {
            Outcome::Success { detail, .. } => Some(detail),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Success { .. } => None,
            Outcome::Failure { error } => Some(error),
        }
    }
}

pub type ThresholdEnvelope = Envelope<ThresholdRequest, ThresholdDetail>;
pub type ComplianceEnvelope = Envelope<ComplianceRequest, ComplianceDetail>;
pub type RecordEnvelope = Envelope<RecordRequest, RecordDetail>;
pub type StatusEnvelope = Envelope<StatusRequest, StatusDetail>;

/// Envelope of any operation, keyed by method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Threshold(ThresholdEnvelope),
    Compliance(ComplianceEnvelope),
    Record(RecordEnvelope),
    Status(StatusEnvelope),
}

impl Response {
    pub fn method(&self) -> Method {
        match self {
            Response::Threshold(envelope) => envelope.method,
            Response::Compliance(envelope) => envelope.method,
            Response::Record(envelope) => envelope.method,
            Response::Status(envelope) => envelope.method,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error().is_none()
    }

    pub fn result(&self) -> Option<bool> {
        match self {
            Response::Threshold(envelope) => envelope.result(),
            Response::Compliance(envelope) => envelope.result(),
            Response::Record(envelope) => envelope.result(),
            Response::Status(envelope) => envelope.result(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Response::Threshold(envelope) => envelope.error(),
            Response::Compliance(envelope) => envelope.error(),
            Response::Record(envelope) => envelope.error(),
            Response::Status(envelope) => envelope.error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::types::DecimalInt;

    fn status_envelope(outcome: Outcome<StatusDetail>) -> StatusEnvelope {
        Envelope {
            method: Method::IsQualified,
            network: "testnet".to_string(),
            params: StatusRequest {
                vendor_id: DecimalInt::from(999u64),
            },
            outcome,
            timestamp: "2024-03-09T14:05:00.000Z".to_string(),
        }
    }

    #[test]
    fn success_serializes_flat_result_and_detail() {
        let envelope = status_envelope(Outcome::Success {
            result: Some(true),
            detail: StatusDetail {
                info: CircuitInfo {
                    circuit: "qualification_status",
                    input: "vendorId=999".to_string(),
                    output: "true".to_string(),
                    privacy: Privacy::PublicBoolean,
                    status: StatusLabel::Qualified,
                },
            },
        });
        let value = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(
            value,
            json!({
                "method": "isQualified",
                "network": "testnet",
                "params": {"vendorId": "999"},
                "result": true,
                "detail": {
                    "circuit": "qualification_status",
                    "input": "vendorId=999",
                    "output": "true",
                    "privacy": "public-boolean",
                    "status": "QUALIFIED"
                },
                "timestamp": "2024-03-09T14:05:00.000Z"
            })
        );
    }

    #[test]
    fn failure_serializes_error_only() {
        let envelope = status_envelope(Outcome::Failure {
            error: "ledger unavailable".to_string(),
        });
        let value = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(value["error"], "ledger unavailable");
        assert!(value.get("result").is_none());
        assert!(value.get("detail").is_none());
        assert_eq!(envelope.result(), None);
        assert!(!envelope.is_success());
    }

    #[test]
    fn false_result_is_still_success() {
        let envelope = status_envelope(Outcome::Success {
            result: Some(false),
            detail: StatusDetail {
                info: CircuitInfo {
                    circuit: "qualification_status",
                    input: "vendorId=999".to_string(),
                    output: "false".to_string(),
                    privacy: Privacy::PublicBoolean,
                    status: StatusLabel::NotQualified,
                },
            },
        });
        let response = Response::Status(envelope);
        assert!(response.is_success());
        assert_eq!(response.result(), Some(false));
        assert_eq!(response.method(), Method::IsQualified);
    }
}
