//! JSON-lines request loading with schema validation.
//!
//! Each non-blank line is one `{"method": ..., "params": {...}}` object. Lines
//! are checked against `schemas/request.schema.json` before deserialization so
//! malformed input is rejected here and never reaches the engine.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::{Draft, Validator};
use serde_json::Value;
use tracing::debug;

use crate::core::types::Request;

pub const REQUEST_SCHEMA: &str = include_str!("../../schemas/request.schema.json");

/// Compiled request schema, reusable across lines.
pub struct RequestValidator {
    compiled: Validator,
}

impl RequestValidator {
    pub fn new() -> Result<Self> {
        let schema: Value = serde_json::from_str(REQUEST_SCHEMA).context("parse request schema")?;
        let compiled = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(&schema)
            .map_err(|err| anyhow!("invalid request schema: {}", err))?;
        Ok(Self { compiled })
    }

    /// Validate one JSON value and convert it into a typed request.
    pub fn parse_value(&self, value: Value) -> Result<Request> {
        let messages: Vec<String> = self
            .compiled
            .iter_errors(&value)
            .map(|err| err.to_string())
            .collect();
        if !messages.is_empty() {
            return Err(anyhow!(
                "request schema validation failed: {}",
                messages.join("; ")
            ));
        }
        serde_json::from_value(value).context("deserialize request")
    }
}

/// Parse JSON-lines text into requests, failing on the first bad line.
pub fn parse_requests(contents: &str) -> Result<Vec<Request>> {
    let validator = RequestValidator::new()?;
    let mut requests = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value =
            serde_json::from_str(line).with_context(|| format!("line {line_no}: parse json"))?;
        let request = validator
            .parse_value(value)
            .with_context(|| format!("line {line_no}"))?;
        requests.push(request);
    }
    debug!(count = requests.len(), "requests parsed");
    Ok(requests)
}

pub fn load_requests(path: &Path) -> Result<Vec<Request>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read requests {}", path.display()))?;
    parse_requests(&contents).with_context(|| format!("parse requests {}", path.display()))
}

pub fn read_requests<R: Read>(mut reader: R) -> Result<Vec<Request>> {
    let mut contents = String::new();
    reader
        .read_to_string(&mut contents)
        .context("read requests from stdin")?;
    parse_requests(&contents)
}
