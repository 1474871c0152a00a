//! Boolean predicates evaluated by the threshold and compliance circuits.

use serde::Serialize;

use crate::core::types::ComplianceRequest;

/// True when the score reaches the threshold (inclusive).
pub fn meets_threshold(score: u64, threshold: u64) -> bool {
    score >= threshold
}

/// True only when every compliance flag holds.
pub fn all_compliant(request: &ComplianceRequest) -> bool {
    request.certification_valid && request.insurance_active && request.payment_history_good
}

/// One row of the per-flag compliance breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlagCheck {
    pub flag: &'static str,
    pub passed: bool,
}

/// Per-flag breakdown for display. [`all_compliant`] stays the authoritative
/// answer.
pub fn compliance_breakdown(request: &ComplianceRequest) -> Vec<FlagCheck> {
    vec![
        FlagCheck {
            flag: "certificationValid",
            passed: request.certification_valid,
        },
        FlagCheck {
            flag: "insuranceActive",
            passed: request.insurance_active,
        },
        FlagCheck {
            flag: "paymentHistoryGood",
            passed: request.payment_history_good,
        },
    ]
}
