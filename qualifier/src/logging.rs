//! Diagnostic tracing for the qualifier, written to stderr.
//!
//! Envelopes on stdout are the product output and never pass through here.
//! Log lines carry methods, backends and registry sizes, but no raw scores
//! or salts.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Takes precedence over `RUST_LOG` when both are set.
pub const LOG_ENV: &str = "QUALIFIER_LOG";

/// Install the stderr subscriber.
///
/// The filter comes from `QUALIFIER_LOG`, then `RUST_LOG`, then the `-v`
/// count. An unparsable env directive falls back to the `-v` level.
///
/// ```bash
/// QUALIFIER_LOG=qualifier::io=debug qualifier batch requests.jsonl
/// qualifier -vv check 999 --record 999
/// ```
pub fn init(verbosity: u8) {
    let from_env = std::env::var(LOG_ENV)
        .ok()
        .or_else(|| std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(directives(from_env.as_deref(), verbosity))
        .unwrap_or_else(|_| EnvFilter::new(verbosity_directives(verbosity)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn directives(from_env: Option<&str>, verbosity: u8) -> String {
    match from_env.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => raw.to_string(),
        None => verbosity_directives(verbosity).to_string(),
    }
}

/// Other crates stay at `warn`; `-v` only raises this crate's level.
fn verbosity_directives(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "warn,qualifier=info",
        2 => "warn,qualifier=debug",
        _ => "warn,qualifier=trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_directive_wins_over_verbosity() {
        assert_eq!(directives(Some("qualifier=trace"), 0), "qualifier=trace");
        assert_eq!(directives(Some(" info "), 3), "info");
    }

    #[test]
    fn blank_env_falls_back_to_verbosity() {
        assert_eq!(directives(None, 0), "warn");
        assert_eq!(directives(Some("  "), 2), "warn,qualifier=debug");
        assert_eq!(directives(None, 9), "warn,qualifier=trace");
    }

    #[test]
    fn every_verbosity_level_is_a_valid_filter() {
        for verbosity in 0..=3 {
            let raw = verbosity_directives(verbosity);
            assert!(EnvFilter::try_new(raw).is_ok(), "{raw}");
        }
    }
}
