//! authrisk core library - biometric authentication failure risk scoring

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Scoring is a pure function of its inputs
// - No global mutable state
// - Randomness only in the simulated ticker, always explicitly seeded
// - Deterministic ordering must be explicit
// - Identical input yields byte-for-byte identical output

pub mod assessment;
pub mod config;
pub mod content;
pub mod regions;
pub mod render;
pub mod risk;
pub mod signals;
pub mod ticker;

pub use assessment::{assess_records, level_distribution, LevelDistribution, PincodeAssessment};
pub use config::ResolvedConfig;
pub use regions::{aggregate_by_state, classify_regions, RegionRisk, StateAggregate};
pub use risk::{
    assess, classify_risk_level, compute_risk_score, normalize_weights, NormalizedWeights,
    RiskAssessment, RiskLevel, RiskSignals, RiskWeights,
};
pub use signals::{InputPolicy, PincodeRecord};

use anyhow::Result;

/// Output of a full batch run: per-record scores plus derived views
#[derive(Debug, Clone, serde::Serialize)]
pub struct BatchReport {
    pub weights: NormalizedWeights,
    pub distribution: LevelDistribution,
    pub states: Vec<RegionRisk>,
    pub pincodes: Vec<PincodeAssessment>,
}

/// Assess a batch of pincode records and build the derived views
///
/// `top_n` truncates the pincode listing only; the distribution and state
/// means always cover the whole batch.
pub fn run_batch(
    records: &[PincodeRecord],
    weights: &RiskWeights,
    top_n: Option<usize>,
) -> BatchReport {
    let mut pincodes = assess_records(records, weights);
    let distribution = level_distribution(pincodes.iter().map(|a| a.level));
    let states = classify_regions(&aggregate_by_state(&pincodes));

    if let Some(n) = top_n {
        pincodes.truncate(n);
    }

    tracing::info!(
        records = records.len(),
        high = distribution.count(RiskLevel::High),
        states = states.len(),
        "batch assessed"
    );

    BatchReport {
        weights: weights.normalized(),
        distribution,
        states,
        pincodes,
    }
}

/// Score one set of user-supplied signals under an input policy
pub fn score_inputs(
    signals: RiskSignals,
    weights: &RiskWeights,
    policy: InputPolicy,
) -> Result<RiskAssessment> {
    let checked = policy.apply(signals)?;
    if weights.is_degenerate() {
        tracing::warn!("weights sum to zero; using default weights 0.5/0.3/0.2");
    }
    Ok(assess(&checked, weights))
}
