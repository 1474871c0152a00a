//! Run a sequence of requests against one engine.
//!
//! Registry state lives only as long as the process, so a batch is the way to
//! record and then query within a single CLI invocation.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::clock::Clock;
use crate::core::types::Request;
use crate::engine::QualificationEngine;
use crate::envelope::Response;
use crate::exit_codes;
use crate::io::ledger::Ledger;

/// Answer `requests` in order. Each call sees the registry as left by the
/// calls before it.
#[instrument(skip_all, fields(network = engine.network_id()))]
pub fn run_batch<L: Ledger, C: Clock>(
    engine: &QualificationEngine<L, C>,
    requests: impl IntoIterator<Item = Request>,
) -> Vec<Response> {
    let responses: Vec<Response> = requests
        .into_iter()
        .map(|request| engine.dispatch(request))
        .collect();
    let failed = responses.iter().filter(|r| !r.is_success()).count();
    info!(total = responses.len(), failed, "batch complete");
    responses
}

/// Write one compact JSON envelope per line.
pub fn write_responses<W: Write>(mut out: W, responses: &[Response]) -> Result<()> {
    for response in responses {
        serde_json::to_writer(&mut out, response).context("serialize envelope")?;
        out.write_all(b"\n").context("write envelope")?;
    }
    out.flush().context("flush envelopes")
}

/// [`exit_codes::OK`] unless some envelope carried an error.
pub fn exit_code(responses: &[Response]) -> i32 {
    if responses.iter().all(Response::is_success) {
        exit_codes::OK
    } else {
        exit_codes::INVALID
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DecimalInt, RecordRequest, StatusRequest, VendorId};
    use crate::test_support::{FailingLedger, FixedClock, simulated_engine};

    fn record(id: u64) -> Request {
        Request::RecordQualification(RecordRequest {
            vendor_id: VendorId::from(id),
        })
    }

    fn status(id: i64) -> Request {
        Request::IsQualified(StatusRequest {
            vendor_id: DecimalInt::from(id),
        })
    }

    #[test]
    fn later_calls_see_earlier_records() {
        let (engine, _) = simulated_engine();
        let responses = run_batch(&engine, vec![status(999), record(999), status(999)]);
        let results: Vec<Option<bool>> = responses.iter().map(Response::result).collect();
        assert_eq!(results, vec![Some(false), None, Some(true)]);
        assert_eq!(exit_code(&responses), exit_codes::OK);
    }

    #[test]
    fn writes_one_line_per_envelope() {
        let (engine, _) = simulated_engine();
        let responses = run_batch(&engine, vec![record(1), status(1)]);
        let mut buf = Vec::new();
        write_responses(&mut buf, &responses).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).expect("json");
        assert_eq!(second["method"], "isQualified");
        assert_eq!(second["result"], true);
    }

    #[test]
    fn any_error_envelope_fails_the_batch() {
        let engine =
            QualificationEngine::with_clock(FailingLedger, FixedClock::default(), "testnet");
        let responses = run_batch(&engine, vec![status(1)]);
        assert_eq!(exit_code(&responses), exit_codes::INVALID);
    }
}
