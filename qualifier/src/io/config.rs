//! Qualifier configuration stored in `qualifier.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "qualifier.toml";

/// Qualifier configuration (TOML).
///
/// Missing fields fall back to a simulated ledger on `testnet`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QualifierConfig {
    /// Opaque network/contract identifier echoed into every envelope. It has
    /// no effect on any outcome.
    pub network_id: String,

    /// Which ledger answers contract calls.
    pub backend: BackendKind,

    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Simulated,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RemoteConfig {
    /// Contract endpoint; required when `backend = "remote"`.
    pub endpoint: String,
}

impl Default for QualifierConfig {
    fn default() -> Self {
        Self {
            network_id: "testnet".to_string(),
            backend: BackendKind::Simulated,
            remote: RemoteConfig::default(),
        }
    }
}

impl QualifierConfig {
    pub fn validate(&self) -> Result<()> {
        if self.network_id.trim().is_empty() {
            return Err(anyhow!("network_id must be a non-empty string"));
        }
        if self.backend == BackendKind::Remote && self.remote.endpoint.trim().is_empty() {
            return Err(anyhow!("remote.endpoint must be set when backend = \"remote\""));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `QualifierConfig::default()`.
pub fn load_config(path: &Path) -> Result<QualifierConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = QualifierConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: QualifierConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    debug!(
        path = %path.display(),
        network_id = %cfg.network_id,
        backend = ?cfg.backend,
        "config loaded"
    );
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &QualifierConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, QualifierConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("qualifier.toml");
        let cfg = QualifierConfig {
            network_id: "vendor-registry-devnet".to_string(),
            backend: BackendKind::Remote,
            remote: RemoteConfig {
                endpoint: "https://rpc.example.invalid".to_string(),
            },
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("qualifier.toml");
        fs::write(&path, "network_id = \"devnet\"\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.network_id, "devnet");
        assert_eq!(cfg.backend, BackendKind::Simulated);
    }

    #[test]
    fn rejects_blank_network_id() {
        let cfg = QualifierConfig {
            network_id: "  ".to_string(),
            ..QualifierConfig::default()
        };
        let err = cfg.validate().expect_err("blank network id");
        assert!(err.to_string().contains("network_id"));
    }

    #[test]
    fn remote_requires_endpoint() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("qualifier.toml");
        fs::write(&path, "backend = \"remote\"\n").expect("write");
        let err = load_config(&path).expect_err("missing endpoint");
        assert!(format!("{err:#}").contains("remote.endpoint"));
    }
}
