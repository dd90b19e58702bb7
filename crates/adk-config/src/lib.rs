//! adk-config
//!
//! YAML run configuration for the CLI runner, plus a canonical-JSON
//! SHA-256 fingerprint of the effective config so reports carry a
//! reproducibility hash.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use adk_engine::{BacktestConfig, UniverseCadence};

/// Paths to the data files a run consumes. All optional; the algorithm's
/// subscriptions decide what is actually read.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataPaths {
    pub bars: Option<PathBuf>,
    pub weekly_sentiment: Option<PathBuf>,
    /// Symbol for the formatted (per-symbol) weekly-sentiment layout.
    pub weekly_sentiment_symbol: Option<String>,
    pub message_sentiment: Option<PathBuf>,
    pub renames: Option<PathBuf>,
    pub universe: Option<PathBuf>,
}

/// Engine knobs, all defaulted to the engine's test defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct EngineKnobs {
    pub max_intents_per_tick: usize,
    pub max_fill_attempts: u32,
    pub universe_cadence: UniverseCadence,
    pub max_universe_symbols: usize,
}

impl Default for EngineKnobs {
    fn default() -> Self {
        let defaults = BacktestConfig::test_defaults();
        Self {
            max_intents_per_tick: defaults.max_intents_per_tick,
            max_fill_attempts: defaults.max_fill_attempts,
            universe_cadence: defaults.universe_cadence,
            max_universe_symbols: defaults.max_universe_symbols,
        }
    }
}

impl EngineKnobs {
    pub fn to_backtest_config(&self) -> BacktestConfig {
        BacktestConfig {
            max_intents_per_tick: self.max_intents_per_tick,
            max_fill_attempts: self.max_fill_attempts,
            universe_cadence: self.universe_cadence,
            max_universe_symbols: self.max_universe_symbols,
        }
    }
}

/// One backtest run, as declared in a YAML file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Registry name of the algorithm to run.
    pub algorithm: String,
    #[serde(default)]
    pub data: DataPaths,
    #[serde(default)]
    pub engine: EngineKnobs,
    /// JSON Lines diagnostics output path; omitted means log to tracing.
    #[serde(default)]
    pub diagnostics: Option<PathBuf>,
}

impl RunConfig {
    fn validate(&self) -> Result<()> {
        if self.algorithm.trim().is_empty() {
            bail!("run config: 'algorithm' must not be empty");
        }
        Ok(())
    }
}

/// Load and validate a run config from a YAML file.
pub fn load_run_config(path: impl AsRef<Path>) -> Result<RunConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read run config: {}", path.display()))?;
    let config: RunConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("invalid run config yaml: {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Canonical-JSON SHA-256 of the effective config.
///
/// Field order is fixed by the struct definition, so the hash is stable
/// across loads of semantically identical configs.
pub fn config_hash(config: &RunConfig) -> Result<String> {
    let canonical =
        serde_json::to_string(config).context("canonical config json serialize failed")?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
