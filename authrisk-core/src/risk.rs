//! Composite risk score calculation
//!
//! Global invariants enforced:
//! - Deterministic risk calculations
//! - Normalized weights always sum to 1
//! - Scores are clamped to [0, 1]
//! - Classification is total over every f64, including out-of-range values

use serde::{Deserialize, Serialize};

/// Weight triple used when the configured weights sum to zero
pub const FALLBACK_WEIGHTS: NormalizedWeights = NormalizedWeights {
    fallback: 0.5,
    loss: 0.3,
    intensity: 0.2,
};

/// The three observed stress signals fed to the score
///
/// Each value is nominally a ratio in [0, 1]. Nothing here enforces that;
/// see [`crate::signals::InputPolicy`] for boundary handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RiskSignals {
    /// D18+ / T18+
    pub fallback_ratio: f64,
    /// B18+ / T18+
    pub biometric_share: f64,
    /// Batch-normalized T18+ / E18+
    pub norm_intensity: f64,
}

impl RiskSignals {
    pub fn new(fallback_ratio: f64, biometric_share: f64, norm_intensity: f64) -> Self {
        RiskSignals {
            fallback_ratio,
            biometric_share,
            norm_intensity,
        }
    }
}

impl Default for RiskSignals {
    /// Starting position of the what-if simulator
    fn default() -> Self {
        RiskSignals::new(0.28, 0.62, 0.35)
    }
}

/// Raw (un-normalized) weights as configured
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RiskWeights {
    pub fallback: f64,
    pub loss: f64,
    pub intensity: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        RiskWeights {
            fallback: 0.5,
            loss: 0.3,
            intensity: 0.2,
        }
    }
}

impl RiskWeights {
    pub fn new(fallback: f64, loss: f64, intensity: f64) -> Self {
        RiskWeights {
            fallback,
            loss,
            intensity,
        }
    }

    pub fn sum(&self) -> f64 {
        self.fallback + self.loss + self.intensity
    }

    /// True when normalization will substitute [`FALLBACK_WEIGHTS`]
    pub fn is_degenerate(&self) -> bool {
        self.sum() == 0.0
    }

    pub fn normalized(&self) -> NormalizedWeights {
        normalize_weights(self.fallback, self.loss, self.intensity)
    }
}

/// Weights scaled to sum to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NormalizedWeights {
    pub fallback: f64,
    pub loss: f64,
    pub intensity: f64,
}

impl NormalizedWeights {
    pub fn sum(&self) -> f64 {
        self.fallback + self.loss + self.intensity
    }
}

/// Normalize raw weights so they sum to 1
///
/// A zero sum yields [`FALLBACK_WEIGHTS`] unchanged. Negative weights are
/// not rejected here.
pub fn normalize_weights(w_fallback: f64, w_loss: f64, w_intensity: f64) -> NormalizedWeights {
    let sum = w_fallback + w_loss + w_intensity;
    if sum == 0.0 {
        return FALLBACK_WEIGHTS;
    }
    NormalizedWeights {
        fallback: w_fallback / sum,
        loss: w_loss / sum,
        intensity: w_intensity / sum,
    }
}

/// Clamp to [0, 1]. NaN maps to 1.0 so an unscoreable input reads as high risk.
fn clamp01(v: f64) -> f64 {
    if v.is_nan() {
        1.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Calculate the composite risk score
///
/// Formula:
/// raw = w_f * fallback_ratio + w_l * (1 - biometric_share) + w_i * norm_intensity
/// score = clamp(raw, 0, 1)
pub fn compute_risk_score(signals: &RiskSignals, weights: &NormalizedWeights) -> f64 {
    let raw = weights.fallback * signals.fallback_ratio
        + weights.loss * (1.0 - signals.biometric_share)
        + weights.intensity * signals.norm_intensity;
    clamp01(raw)
}

/// Ordinal risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    fn band(&self) -> &'static LevelBand {
        match self {
            RiskLevel::Low => &LEVEL_BANDS[0],
            RiskLevel::Medium => &LEVEL_BANDS[1],
            RiskLevel::High => &LEVEL_BANDS[2],
        }
    }

    /// Recommended operational action
    pub fn action(&self) -> &'static str {
        self.band().action
    }

    /// Abbreviated action used in map tooltips
    pub fn tooltip_action(&self) -> &'static str {
        self.band().tooltip_action
    }

    /// Human-readable score range, e.g. "0.3 ≤ score < 0.6"
    pub fn range_label(&self) -> &'static str {
        self.band().range_label
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the classification table: `lower <= score < upper`
#[derive(Debug, Clone, Copy)]
pub struct LevelBand {
    pub lower: f64,
    pub upper: f64,
    pub level: RiskLevel,
    pub action: &'static str,
    pub tooltip_action: &'static str,
    pub range_label: &'static str,
}

/// Classification table, evaluated in order
///
/// The outer bounds are infinite so out-of-range scores still resolve.
pub static LEVEL_BANDS: [LevelBand; 3] = [
    LevelBand {
        lower: f64::NEG_INFINITY,
        upper: 0.3,
        level: RiskLevel::Low,
        action: "Normal biometric authentication flow",
        tooltip_action: "Normal biometric flow",
        range_label: "< 0.3",
    },
    LevelBand {
        lower: 0.3,
        upper: 0.6,
        level: RiskLevel::Medium,
        action: "Prepare and prioritize fallback mechanisms",
        tooltip_action: "Prepare & prioritize fallback",
        range_label: "0.3 ≤ score < 0.6",
    },
    LevelBand {
        lower: 0.6,
        upper: f64::INFINITY,
        level: RiskLevel::High,
        action: "Proactively enable OTP or Iris to prevent service denial",
        tooltip_action: "Proactively enable OTP/Iris",
        range_label: "≥ 0.6",
    },
];

/// Assign a risk level to a score
///
/// Rows are checked in order against their exclusive upper bound; anything
/// that matches no row (+inf, NaN) lands in the last row.
pub fn classify_level(score: f64) -> RiskLevel {
    LEVEL_BANDS
        .iter()
        .find(|band| score < band.upper)
        .unwrap_or(&LEVEL_BANDS[LEVEL_BANDS.len() - 1])
        .level
}

/// Assign a risk level and its recommended action to a score
pub fn classify_risk_level(score: f64) -> (RiskLevel, &'static str) {
    let level = classify_level(score);
    (level, level.action())
}

/// Full output of one scoring pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RiskAssessment {
    pub signals: RiskSignals,
    pub weights: NormalizedWeights,
    pub score: f64,
    pub level: RiskLevel,
    pub action: String,
}

/// Normalize weights, score and classify in one pass
pub fn assess(signals: &RiskSignals, weights: &RiskWeights) -> RiskAssessment {
    let normalized = weights.normalized();
    let score = compute_risk_score(signals, &normalized);
    let (level, action) = classify_risk_level(score);
    RiskAssessment {
        signals: *signals,
        weights: normalized,
        score,
        level,
        action: action.to_string(),
    }
}

/// Render the score formula with the given weights, two decimals each
pub fn formula_text(weights: &NormalizedWeights) -> String {
    format!(
        "Risk Score = {:.2}×Fallback + {:.2}×(1−BiometricShare) + {:.2}×NormIntensity",
        weights.fallback, weights.loss, weights.intensity
    )
}
