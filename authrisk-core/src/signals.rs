//! Stress signals derived from raw 18+ authentication counts
//!
//! Per pincode record:
//! - T = B + D (total authentication demand)
//! - Biometric share = B / T
//! - Fallback dependency ratio = D / T
//! - Authentication intensity = T / E
//!
//! Intensity is min-max normalized across the batch before scoring.

use crate::risk::RiskSignals;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One row of the aggregated date × state × district × pincode dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PincodeRecord {
    pub date: String,
    pub state: String,
    pub district: String,
    pub pincode: String,
    /// B18+: successful biometric authentications
    pub biometric: u64,
    /// D18+: demographic (fallback) authentications
    pub demographic: u64,
    /// E18+: enrolled population
    pub enrolled: u64,
}

/// Un-normalized ratios for a single record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RawSignals {
    pub biometric_share: f64,
    pub fallback_ratio: f64,
    pub auth_intensity: f64,
}

impl PincodeRecord {
    /// T18+
    pub fn total_demand(&self) -> u64 {
        self.biometric.saturating_add(self.demographic)
    }

    /// Compute the three ratios. Zero denominators yield 0.0.
    pub fn raw_signals(&self) -> RawSignals {
        let total = self.total_demand();
        let (biometric_share, fallback_ratio) = if total == 0 {
            (0.0, 0.0)
        } else {
            (
                self.biometric as f64 / total as f64,
                self.demographic as f64 / total as f64,
            )
        };
        let auth_intensity = if self.enrolled == 0 {
            0.0
        } else {
            total as f64 / self.enrolled as f64
        };
        RawSignals {
            biometric_share,
            fallback_ratio,
            auth_intensity,
        }
    }
}

/// Min-max normalize values into [0, 1]
///
/// A batch with zero range (including a single value) maps every entry to 0.0.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !range.is_finite() || range <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - min) / range).collect()
}

/// Derive engine inputs for a batch, normalizing intensity across it
///
/// Output order matches input order.
pub fn derive_signals(records: &[PincodeRecord]) -> Vec<RiskSignals> {
    let raw: Vec<RawSignals> = records.iter().map(PincodeRecord::raw_signals).collect();
    let intensities: Vec<f64> = raw.iter().map(|r| r.auth_intensity).collect();
    let normalized = min_max_normalize(&intensities);

    raw.iter()
        .zip(normalized)
        .map(|(r, norm_intensity)| RiskSignals {
            fallback_ratio: r.fallback_ratio,
            biometric_share: r.biometric_share,
            norm_intensity,
        })
        .collect()
}

/// Load pincode records from a JSON array
pub fn load_records(path: &Path) -> Result<Vec<PincodeRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read records file: {}", path.display()))?;
    let records: Vec<PincodeRecord> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse records file: {}", path.display()))?;
    tracing::debug!(count = records.len(), path = %path.display(), "loaded pincode records");
    Ok(records)
}

/// How user-supplied ratios are treated before scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputPolicy {
    /// Clamp each ratio into [0, 1] and log a warning
    #[default]
    Clamp,
    /// Reject any ratio outside [0, 1] or non-finite
    Strict,
    /// Hand values to the engine untouched
    Passthrough,
}

impl InputPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputPolicy::Clamp => "clamp",
            InputPolicy::Strict => "strict",
            InputPolicy::Passthrough => "passthrough",
        }
    }

    /// Apply the policy to a set of signals
    pub fn apply(&self, signals: RiskSignals) -> Result<RiskSignals> {
        let fields = [
            ("fallback_ratio", signals.fallback_ratio),
            ("biometric_share", signals.biometric_share),
            ("norm_intensity", signals.norm_intensity),
        ];

        match self {
            InputPolicy::Passthrough => Ok(signals),
            InputPolicy::Strict => {
                for (name, value) in fields {
                    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                        anyhow::bail!("{} must be within [0, 1] (got {})", name, value);
                    }
                }
                Ok(signals)
            }
            InputPolicy::Clamp => {
                for (name, value) in fields {
                    if !(0.0..=1.0).contains(&value) {
                        tracing::warn!(input = name, value, "ratio outside [0, 1], clamping");
                    }
                }
                Ok(RiskSignals {
                    fallback_ratio: clamp_ratio(signals.fallback_ratio),
                    biometric_share: clamp_ratio(signals.biometric_share),
                    norm_intensity: clamp_ratio(signals.norm_intensity),
                })
            }
        }
    }
}

/// NaN clamps to 0.0 here; only the engine treats NaN as worst case
fn clamp_ratio(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
