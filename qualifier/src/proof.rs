//! Simulated proof binding for the threshold circuit.
//!
//! This is a placeholder for a real proof: a SHA-256 digest that ties the
//! public inputs, the salt and the outcome together. The raw score is never
//! hashed, so the digest reveals nothing beyond the boolean result.

use sha2::{Digest, Sha256};

use crate::core::types::{DecimalInt, Method};

/// Hex-encoded binding over `(circuit, network, threshold, salt, outcome)`.
pub fn threshold_binding(
    network_id: &str,
    threshold: u64,
    salt: &DecimalInt,
    outcome: bool,
) -> String {
    let threshold = threshold.to_string();
    let salt = salt.to_string();
    let mut hasher = Sha256::new();
    for part in [
        Method::EvaluateThreshold.circuit(),
        network_id,
        threshold.as_str(),
        salt.as_str(),
    ] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hasher.update([u8::from(outcome)]);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_is_deterministic() {
        let salt = DecimalInt::from(12345u64);
        let a = threshold_binding("testnet", 80, &salt, true);
        let b = threshold_binding("testnet", 80, &salt, true);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn binding_changes_with_salt_and_outcome() {
        let base = threshold_binding("testnet", 80, &DecimalInt::from(1u64), true);
        assert_ne!(
            base,
            threshold_binding("testnet", 80, &DecimalInt::from(2u64), true)
        );
        assert_ne!(
            base,
            threshold_binding("testnet", 80, &DecimalInt::from(1u64), false)
        );
        assert_ne!(
            base,
            threshold_binding("mainnet", 80, &DecimalInt::from(1u64), true)
        );
    }
}
