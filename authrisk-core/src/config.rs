//! Configuration file support for authrisk
//!
//! Loads project-specific configuration from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.authriskrc.json` in the working directory
//! 3. `authrisk.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::risk::RiskWeights;
use crate::signals::InputPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_TICKER_SEED: u64 = 2026;
const DEFAULT_TICKER_INTERVAL_MS: u64 = 1000;
const DEFAULT_TICKER_TICKS: usize = 10;

/// authrisk configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthRiskConfig {
    /// Raw signal weights (normalized before use)
    #[serde(default)]
    pub weights: Option<WeightConfig>,

    /// Treatment of out-of-range input ratios (default: clamp)
    #[serde(default)]
    pub input_policy: Option<InputPolicy>,

    /// Simulated ticker settings
    #[serde(default)]
    pub ticker: Option<TickerSettings>,

    /// Maximum number of rows in region and pincode listings
    #[serde(default)]
    pub top: Option<usize>,
}

/// Raw signal weights
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightConfig {
    /// Weight for fallback dependency ratio (default: 0.5)
    pub fallback: Option<f64>,
    /// Weight for loss of biometric share (default: 0.3)
    pub loss: Option<f64>,
    /// Weight for normalized authentication intensity (default: 0.2)
    pub intensity: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TickerSettings {
    pub seed: Option<u64>,
    pub interval_ms: Option<u64>,
    pub ticks: Option<usize>,
}

/// Resolved configuration with every default filled in
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub weights: RiskWeights,
    pub input_policy: InputPolicy,
    pub ticker_seed: u64,
    pub ticker_interval_ms: u64,
    pub ticker_ticks: usize,
    pub top_n: Option<usize>,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl AuthRiskConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        // Weights must be finite and non-negative, with a finite sum. A zero
        // sum is allowed; the engine substitutes its fallback weights.
        if let Some(ref w) = self.weights {
            for (name, val) in [
                ("fallback", w.fallback),
                ("loss", w.loss),
                ("intensity", w.intensity),
            ] {
                if let Some(v) = val {
                    if !v.is_finite() {
                        anyhow::bail!("weights.{} must be finite (got {})", name, v);
                    }
                    if v < 0.0 {
                        anyhow::bail!("weights.{} must be non-negative (got {})", name, v);
                    }
                }
            }

            let defaults = RiskWeights::default();
            let sum = w.fallback.unwrap_or(defaults.fallback)
                + w.loss.unwrap_or(defaults.loss)
                + w.intensity.unwrap_or(defaults.intensity);
            if !sum.is_finite() {
                anyhow::bail!("weights overflow when summed");
            }
        }

        if let Some(ref t) = self.ticker {
            if t.interval_ms == Some(0) {
                anyhow::bail!("ticker.interval_ms must be positive (got 0)");
            }
        }

        validate_top(self.top)?;

        Ok(())
    }

    /// Resolve config into concrete values ready for use
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let defaults = RiskWeights::default();
        let weights = match &self.weights {
            Some(w) => RiskWeights::new(
                w.fallback.unwrap_or(defaults.fallback),
                w.loss.unwrap_or(defaults.loss),
                w.intensity.unwrap_or(defaults.intensity),
            ),
            None => defaults,
        };

        let (ticker_seed, ticker_interval_ms, ticker_ticks) = match &self.ticker {
            Some(t) => (
                t.seed.unwrap_or(DEFAULT_TICKER_SEED),
                t.interval_ms.unwrap_or(DEFAULT_TICKER_INTERVAL_MS),
                t.ticks.unwrap_or(DEFAULT_TICKER_TICKS),
            ),
            None => (
                DEFAULT_TICKER_SEED,
                DEFAULT_TICKER_INTERVAL_MS,
                DEFAULT_TICKER_TICKS,
            ),
        };

        Ok(ResolvedConfig {
            weights,
            input_policy: self.input_policy.unwrap_or_default(),
            ticker_seed,
            ticker_interval_ms,
            ticker_ticks,
            top_n: self.top,
            config_path: None,
        })
    }
}

/// Check a complete weight triple against the same bounds as the config file
pub fn validate_weights(weights: &RiskWeights) -> Result<()> {
    let config = AuthRiskConfig {
        weights: Some(WeightConfig {
            fallback: Some(weights.fallback),
            loss: Some(weights.loss),
            intensity: Some(weights.intensity),
        }),
        ..AuthRiskConfig::default()
    };
    config.validate()
}

/// Listing limits must be positive when given
pub fn validate_top(top: Option<usize>) -> Result<()> {
    if top == Some(0) {
        anyhow::bail!("top must be positive (got 0)");
    }
    Ok(())
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        AuthRiskConfig::default().resolve()
    }
}

/// Discover and load a config file from the project root
///
/// Search order:
/// 1. `.authriskrc.json`
/// 2. `authrisk.config.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(project_root: &Path) -> Result<Option<(AuthRiskConfig, PathBuf)>> {
    for name in [".authriskrc.json", "authrisk.config.json"] {
        let path = project_root.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }
    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<AuthRiskConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: AuthRiskConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config for a project
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config from the project root.
/// Returns default config if nothing is found.
pub fn load_and_resolve(project_root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(project_root)? {
            Some((config, path)) => (config, Some(path)),
            None => (AuthRiskConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    if resolved.weights.is_degenerate() {
        tracing::warn!("configured weights sum to zero; default weights 0.5/0.3/0.2 will be used");
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config_is_valid() {
        let config = AuthRiskConfig::default();
        config.validate().expect("default config should be valid");
        let resolved = config.resolve().expect("default config should resolve");
        assert_eq!(resolved.weights, RiskWeights::default());
        assert_eq!(resolved.input_policy, InputPolicy::Clamp);
        assert_eq!(resolved.ticker_seed, 2026);
        assert_eq!(resolved.ticker_interval_ms, 1000);
        assert_eq!(resolved.ticker_ticks, 10);
        assert!(resolved.top_n.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let json = r#"{}"#;
        let config: AuthRiskConfig = serde_json::from_str(json).unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "weights": {"fallback": 2.0, "loss": 1.0, "intensity": 1.0},
            "input_policy": "strict",
            "ticker": {"seed": 42, "interval_ms": 500, "ticks": 3},
            "top": 15
        }"#;
        let config: AuthRiskConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.weights, RiskWeights::new(2.0, 1.0, 1.0));
        assert_eq!(resolved.input_policy, InputPolicy::Strict);
        assert_eq!(resolved.ticker_seed, 42);
        assert_eq!(resolved.ticker_interval_ms, 500);
        assert_eq!(resolved.ticker_ticks, 3);
        assert_eq!(resolved.top_n, Some(15));
    }

    #[test]
    fn test_reject_unknown_fields() {
        let json = r#"{"unknown_field": true}"#;
        let result: Result<AuthRiskConfig, _> = serde_json::from_str(json);
        assert!(result.is_err(), "unknown fields should be rejected");
    }

    #[test]
    fn test_reject_unknown_policy() {
        let json = r#"{"input_policy": "lenient"}"#;
        let result: Result<AuthRiskConfig, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_reject_negative_weight() {
        let json = r#"{"weights": {"loss": -0.1}}"#;
        let config: AuthRiskConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_top_flag() {
        assert!(validate_top(None).is_ok());
        assert!(validate_top(Some(5)).is_ok());
        let err = validate_top(Some(0)).unwrap_err();
        assert!(err.to_string().contains("top must be positive"));
    }

    #[test]
    fn test_scaled_weights_accepted() {
        let json = r#"{"weights": {"fallback": 50.0, "loss": 30.0, "intensity": 20.0}}"#;
        let config: AuthRiskConfig = serde_json::from_str(json).unwrap();
        let scaled = config.resolve().unwrap().weights.normalized();
        let defaults = RiskWeights::default().normalized();
        assert!((scaled.fallback - defaults.fallback).abs() < 1e-12);
        assert!((scaled.loss - defaults.loss).abs() < 1e-12);
        assert!((scaled.intensity - defaults.intensity).abs() < 1e-12);
    }

    #[test]
    fn test_reject_overflowing_weight_sum() {
        assert!(validate_weights(&RiskWeights::new(f64::MAX, f64::MAX, 0.0)).is_err());
    }

    #[test]
    fn test_zero_weights_accepted() {
        let json = r#"{"weights": {"fallback": 0.0, "loss": 0.0, "intensity": 0.0}}"#;
        let config: AuthRiskConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert!(resolved.weights.is_degenerate());
    }

    #[test]
    fn test_validate_weights() {
        assert!(validate_weights(&RiskWeights::default()).is_ok());
        assert!(validate_weights(&RiskWeights::new(0.0, 0.0, 0.0)).is_ok());
        assert!(validate_weights(&RiskWeights::new(0.5, -0.3, 0.2)).is_err());
        assert!(validate_weights(&RiskWeights::new(f64::NAN, 0.3, 0.2)).is_err());
    }

    #[test]
    fn test_validate_weights_ignores_scale() {
        assert!(validate_weights(&RiskWeights::new(50.0, 30.0, 20.0)).is_ok());
        assert!(validate_weights(&RiskWeights::new(5000.0, 0.0, 1.0)).is_ok());
    }

    #[test]
    fn test_reject_zero_interval() {
        let json = r#"{"ticker": {"interval_ms": 0}}"#;
        let config: AuthRiskConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_zero_top() {
        let json = r#"{"top": 0}"#;
        let config: AuthRiskConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_weights_use_defaults_for_rest() {
        let json = r#"{"weights": {"intensity": 0.6}}"#;
        let config: AuthRiskConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.weights.fallback, 0.5); // default
        assert_eq!(resolved.weights.loss, 0.3); // default
        assert_eq!(resolved.weights.intensity, 0.6);
    }

    #[test]
    fn test_discover_authriskrc() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(".authriskrc.json");
        fs::write(&config_path, r#"{"top": 5}"#).unwrap();

        let result = discover_config(dir.path()).unwrap();
        let (config, path) = result.expect("config should be discovered");
        assert_eq!(config.top, Some(5));
        assert_eq!(path, config_path);
    }

    #[test]
    fn test_discover_priority_order() {
        let dir = tempfile::tempdir().unwrap();

        // Create both config files - .authriskrc.json should win
        fs::write(dir.path().join(".authriskrc.json"), r#"{"top": 1}"#).unwrap();
        fs::write(dir.path().join("authrisk.config.json"), r#"{"top": 2}"#).unwrap();

        let (config, _) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.top, Some(1), ".authriskrc.json should take priority");
    }

    #[test]
    fn test_discover_config_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("authrisk.config.json"),
            r#"{"input_policy": "passthrough"}"#,
        )
        .unwrap();

        let (config, _) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.input_policy, Some(InputPolicy::Passthrough));
    }

    #[test]
    fn test_no_config_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = discover_config(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("bad.json");
        fs::write(&config_path, r#"{"weights": {"loss": -1.0}}"#).unwrap();

        let err = load_config_file(&config_path).unwrap_err();
        assert!(format!("{:#}", err).contains("bad.json"));
    }

    #[test]
    fn test_load_and_resolve_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = load_and_resolve(dir.path(), None).unwrap();
        assert!(resolved.config_path.is_none());
        assert_eq!(resolved.weights, RiskWeights::default());
    }

    #[test]
    fn test_load_and_resolve_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.json");
        fs::write(&config_path, r#"{"weights": {"fallback": 1.0}}"#).unwrap();

        let resolved = load_and_resolve(dir.path(), Some(&config_path)).unwrap();
        assert_eq!(resolved.weights.fallback, 1.0);
        assert_eq!(resolved.config_path, Some(config_path));
    }
}
