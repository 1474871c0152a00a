//! Typed request shapes and identifiers for the qualification contract.
//!
//! Every value here is plain data: parsing is total over well-formed input and
//! nothing touches the registry or the clock.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow, bail};
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Arbitrary-size signed integer kept in canonical decimal form.
///
/// Leading zeros are stripped and zero is never negative, so two values are
/// equal exactly when they denote the same integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DecimalInt {
    negative: bool,
    digits: Digits,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Digits(String);

impl Default for Digits {
    fn default() -> Self {
        Self("0".to_string())
    }
}

impl DecimalInt {
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Canonical decimal digits without the sign.
    pub fn magnitude(&self) -> &str {
        &self.digits.0
    }

    /// The vendor id this value names, if it is non-negative.
    pub fn to_vendor_id(&self) -> Option<VendorId> {
        if self.negative {
            None
        } else {
            Some(VendorId(self.clone()))
        }
    }
}

impl FromStr for DecimalInt {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let (negative, body) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        if body.is_empty() {
            bail!("expected an integer, got {:?}", raw);
        }
        if !body.bytes().all(|b| b.is_ascii_digit()) {
            bail!("expected an integer, got {:?}", raw);
        }
        let stripped = body.trim_start_matches('0');
        if stripped.is_empty() {
            return Ok(Self::default());
        }
        Ok(Self {
            negative,
            digits: Digits(stripped.to_string()),
        })
    }
}

impl From<u64> for DecimalInt {
    fn from(value: u64) -> Self {
        Self {
            negative: false,
            digits: Digits(value.to_string()),
        }
    }
}

impl From<i64> for DecimalInt {
    fn from(value: i64) -> Self {
        Self {
            negative: value < 0,
            digits: Digits(value.unsigned_abs().to_string()),
        }
    }
}

impl fmt::Display for DecimalInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str(self.magnitude())
    }
}

impl Ord for DecimalInt {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => cmp_magnitude(self.magnitude(), other.magnitude()),
            (true, true) => cmp_magnitude(other.magnitude(), self.magnitude()),
        }
    }
}

impl PartialOrd for DecimalInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn cmp_magnitude(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl Serialize for DecimalInt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accepts a JSON integer of any length or a decimal string. Integers are read
/// from their exact source text, so values beyond 64 bits keep every digit.
impl<'de> Deserialize<'de> for DecimalInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match Value::deserialize(deserializer)? {
            Value::Number(number) => number.to_string().parse::<DecimalInt>(),
            Value::String(text) => text.parse::<DecimalInt>(),
            other => {
                return Err(de::Error::invalid_type(
                    unexpected(&other),
                    &"an integer or a decimal string",
                ));
            }
        };
        parsed.map_err(|err| de::Error::custom(format!("{err:#}")))
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(flag) => Unexpected::Bool(*flag),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
        Value::Number(_) | Value::String(_) => Unexpected::Other("number or string"),
    }
}

/// Non-negative vendor identifier with no upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "DecimalInt", into = "DecimalInt")]
pub struct VendorId(DecimalInt);

impl VendorId {
    pub fn as_decimal(&self) -> &DecimalInt {
        &self.0
    }
}

impl TryFrom<DecimalInt> for VendorId {
    type Error = anyhow::Error;

    fn try_from(value: DecimalInt) -> Result<Self> {
        value
            .to_vendor_id()
            .ok_or_else(|| anyhow!("vendor id must be non-negative, got {}", value))
    }
}

impl From<VendorId> for DecimalInt {
    fn from(value: VendorId) -> Self {
        value.0
    }
}

impl From<u64> for VendorId {
    fn from(value: u64) -> Self {
        Self(DecimalInt::from(value))
    }
}

impl FromStr for VendorId {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        Self::try_from(raw.parse::<DecimalInt>()?)
    }
}

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Contract operation names, as they appear in the `method` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Method {
    EvaluateThreshold,
    EvaluateCompliance,
    RecordQualification,
    IsQualified,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::EvaluateThreshold => "evaluateThreshold",
            Method::EvaluateCompliance => "evaluateCompliance",
            Method::RecordQualification => "recordQualification",
            Method::IsQualified => "isQualified",
        }
    }

    /// Circuit name reported in the envelope detail.
    pub fn circuit(self) -> &'static str {
        match self {
            Method::EvaluateThreshold => "vendor_threshold",
            Method::EvaluateCompliance => "vendor_compliance",
            Method::RecordQualification => "record_qualification",
            Method::IsQualified => "qualification_status",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score-versus-threshold check. The salt is echoed and bound into the
/// simulated proof but never affects the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ThresholdRequest {
    pub vendor_score: u64,
    pub minimum_threshold: u64,
    #[serde(default)]
    pub salt: DecimalInt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComplianceRequest {
    pub certification_valid: bool,
    pub insurance_active: bool,
    pub payment_history_good: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecordRequest {
    pub vendor_id: VendorId,
}

/// Membership lookup. Any integer is accepted; negative ids are never
/// recorded and so are never qualified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StatusRequest {
    pub vendor_id: DecimalInt,
}

/// One contract call, keyed by method name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum Request {
    EvaluateThreshold(ThresholdRequest),
    EvaluateCompliance(ComplianceRequest),
    RecordQualification(RecordRequest),
    IsQualified(StatusRequest),
}

impl Request {
    pub fn method(&self) -> Method {
        match self {
            Request::EvaluateThreshold(_) => Method::EvaluateThreshold,
            Request::EvaluateCompliance(_) => Method::EvaluateCompliance,
            Request::RecordQualification(_) => Method::RecordQualification,
            Request::IsQualified(_) => Method::IsQualified,
        }
    }
}
