//! Vendor qualification CLI.
//!
//! Each invocation builds one engine over a fresh in-memory registry, answers
//! the requested calls, and prints one JSON envelope per call on stdout.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing::debug;

use qualifier::batch::{exit_code, run_batch, write_responses};
use qualifier::core::registry::Registry;
use qualifier::core::types::{
    ComplianceRequest, DecimalInt, RecordRequest, Request, StatusRequest, ThresholdRequest,
    VendorId,
};
use qualifier::engine::QualificationEngine;
use qualifier::exit_codes;
use qualifier::io::config::{DEFAULT_CONFIG_FILE, QualifierConfig, load_config, write_config};
use qualifier::io::ledger::ledger_from_config;
use qualifier::io::requests::{load_requests, read_requests};
use qualifier::logging;

#[derive(Parser)]
#[command(
    name = "qualifier",
    version,
    about = "Vendor qualification contract simulator"
)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Raise log verbosity on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config file if it is missing.
    Init {
        /// Overwrite an existing config file.
        #[arg(short, long)]
        force: bool,
    },
    /// Check whether a vendor score reaches the minimum threshold.
    Threshold {
        #[arg(long)]
        score: u64,
        #[arg(long)]
        threshold: u64,
        /// Proof-binding salt; does not affect the outcome.
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        salt: DecimalInt,
    },
    /// Check that certification, insurance, and payment history all hold.
    Compliance {
        #[arg(long)]
        certification_valid: bool,
        #[arg(long)]
        insurance_active: bool,
        #[arg(long)]
        payment_history_good: bool,
    },
    /// Record vendors as qualified, in order.
    Record {
        #[arg(required = true)]
        vendor_ids: Vec<VendorId>,
    },
    /// Check whether a vendor is qualified, optionally recording vendors first.
    Check {
        #[arg(allow_negative_numbers = true)]
        vendor_id: DecimalInt,
        /// Vendor to record before the check (repeatable).
        #[arg(long = "record")]
        records: Vec<VendorId>,
    },
    /// Answer JSON-lines requests from FILE (or stdin) against one registry.
    Batch { file: Option<PathBuf> },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    if let Command::Init { force } = cli.command {
        cmd_init(&cli.config, force)?;
        return Ok(exit_codes::OK);
    }
    let cfg = load_config(&cli.config)?;
    let requests = requests_for(cli.command)?;

    let registry = Arc::new(Registry::new());
    let ledger = ledger_from_config(&cfg, registry);
    debug!(backend = ledger.name(), network_id = %cfg.network_id, "engine ready");
    let engine = QualificationEngine::new(ledger, cfg.network_id);

    let responses = run_batch(&engine, requests);
    write_responses(io::stdout().lock(), &responses)?;
    Ok(exit_code(&responses))
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if !force && path.exists() {
        debug!(path = %path.display(), "config exists, leaving it in place");
        return Ok(());
    }
    write_config(path, &QualifierConfig::default())?;
    debug!(path = %path.display(), "default config written");
    Ok(())
}

fn requests_for(command: Command) -> Result<Vec<Request>> {
    let requests = match command {
        Command::Init { .. } => bail!("init issues no contract calls"),
        Command::Threshold {
            score,
            threshold,
            salt,
        } => vec![Request::EvaluateThreshold(ThresholdRequest {
            vendor_score: score,
            minimum_threshold: threshold,
            salt,
        })],
        Command::Compliance {
            certification_valid,
            insurance_active,
            payment_history_good,
        } => vec![Request::EvaluateCompliance(ComplianceRequest {
            certification_valid,
            insurance_active,
            payment_history_good,
        })],
        Command::Record { vendor_ids } => vendor_ids
            .into_iter()
            .map(|vendor_id| Request::RecordQualification(RecordRequest { vendor_id }))
            .collect(),
        Command::Check { vendor_id, records } => records
            .into_iter()
            .map(|vendor_id| Request::RecordQualification(RecordRequest { vendor_id }))
            .chain(std::iter::once(Request::IsQualified(StatusRequest {
                vendor_id,
            })))
            .collect(),
        Command::Batch { file: Some(path) } => load_requests(&path)?,
        Command::Batch { file: None } => read_requests(io::stdin().lock())?,
    };
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::parse_from(["qualifier", "init"]);
        assert!(matches!(cli.command, Command::Init { force: false }));
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["qualifier", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true }));
    }

    #[test]
    fn init_keeps_existing_config_unless_forced() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("qualifier.toml");
        std::fs::write(&path, "network_id = \"devnet\"\n").expect("write");

        cmd_init(&path, false).expect("init");
        assert_eq!(load_config(&path).expect("load").network_id, "devnet");

        cmd_init(&path, true).expect("init --force");
        assert_eq!(load_config(&path).expect("load"), QualifierConfig::default());
    }

    #[test]
    fn parse_threshold_with_negative_salt() {
        let cli = Cli::parse_from([
            "qualifier",
            "threshold",
            "--score",
            "85",
            "--threshold",
            "80",
            "--salt",
            "-12345",
        ]);
        match cli.command {
            Command::Threshold { salt, .. } => assert_eq!(salt, DecimalInt::from(-12345i64)),
            _ => panic!("expected threshold command"),
        }
    }

    #[test]
    fn parse_check_with_records() {
        let cli = Cli::parse_from([
            "qualifier",
            "check",
            "999",
            "--record",
            "999",
            "--record",
            "5",
        ]);
        let requests = requests_for(cli.command).expect("requests");
        assert_eq!(requests.len(), 3);
        assert!(matches!(requests[2], Request::IsQualified(_)));
    }

    #[test]
    fn parse_check_negative_id() {
        let cli = Cli::parse_from(["qualifier", "check", "-7"]);
        assert!(matches!(
            cli.command,
            Command::Check { ref vendor_id, .. } if vendor_id.is_negative()
        ));
    }

    #[test]
    fn record_rejects_negative_id() {
        assert!(Cli::try_parse_from(["qualifier", "record", "--", "-1"]).is_err());
    }

    #[test]
    fn compliance_flags_default_to_false() {
        let cli = Cli::parse_from(["qualifier", "compliance", "--insurance-active"]);
        let requests = requests_for(cli.command).expect("requests");
        assert_eq!(
            requests,
            vec![Request::EvaluateCompliance(ComplianceRequest {
                certification_valid: false,
                insurance_active: true,
                payment_history_good: false,
            })]
        );
    }

    #[test]
    fn verbosity_counts_repeated_flags() {
        let cli = Cli::parse_from(["qualifier", "-vv", "check", "1"]);
        assert_eq!(cli.verbose, 2);
        let cli = Cli::parse_from(["qualifier", "check", "1"]);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["qualifier", "record", "1", "--config", "alt.toml"]);
        assert_eq!(cli.config, PathBuf::from("alt.toml"));
    }
}
