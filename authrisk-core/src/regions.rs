//! State-level aggregates for the choropleth view
//!
//! Aggregates are either supplied pre-computed or rolled up from pincode
//! assessments. Either way they are classified through the same level
//! function as individual scores.
//!
//! Global invariants enforced:
//! - Aggregates are strictly derived (never stored)
//! - Deterministic ordering

use crate::assessment::PincodeAssessment;
use crate::risk::{self, RiskLevel};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Pre-computed per-state aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateAggregate {
    pub state: String,
    pub risk_score_mean: f64,
    pub pincodes: usize,
}

/// State aggregate with its level, for colour binning and tooltips
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegionRisk {
    pub state: String,
    pub risk_score_mean: f64,
    pub pincodes: usize,
    pub level: RiskLevel,
    pub tooltip_action: String,
}

impl From<&StateAggregate> for RegionRisk {
    fn from(agg: &StateAggregate) -> Self {
        let level = risk::classify_level(agg.risk_score_mean);
        RegionRisk {
            state: agg.state.clone(),
            risk_score_mean: agg.risk_score_mean,
            pincodes: agg.pincodes,
            level,
            tooltip_action: level.tooltip_action().to_string(),
        }
    }
}

/// Classify every aggregate; output sorted by mean descending, then state
pub fn classify_regions(aggregates: &[StateAggregate]) -> Vec<RegionRisk> {
    let mut regions: Vec<RegionRisk> = aggregates.iter().map(RegionRisk::from).collect();
    regions.sort_by(|a, b| {
        b.risk_score_mean
            .total_cmp(&a.risk_score_mean)
            .then_with(|| a.state.cmp(&b.state))
    });
    regions
}

/// Find a region by state name, ignoring case and surrounding whitespace
pub fn find_region<'a>(regions: &'a [RegionRisk], state: &str) -> Option<&'a RegionRisk> {
    let wanted = state.trim();
    regions
        .iter()
        .find(|r| r.state.eq_ignore_ascii_case(wanted))
}

/// Roll pincode assessments up to per-state mean score and pincode count
///
/// A pincode seen on several dates counts once; its scores all feed the mean.
pub fn aggregate_by_state(assessments: &[PincodeAssessment]) -> Vec<StateAggregate> {
    let mut state_data: HashMap<&str, (f64, usize, HashSet<&str>)> = HashMap::new();

    for a in assessments {
        let entry = state_data
            .entry(a.state.as_str())
            .or_insert_with(|| (0.0, 0, HashSet::new()));
        entry.0 += a.score;
        entry.1 += 1;
        entry.2.insert(a.pincode.as_str());
    }

    let mut aggregates: Vec<StateAggregate> = state_data
        .into_iter()
        .map(|(state, (sum, n, pincodes))| StateAggregate {
            state: state.to_string(),
            risk_score_mean: sum / n as f64,
            pincodes: pincodes.len(),
        })
        .collect();

    aggregates.sort_by(|a, b| {
        b.risk_score_mean
            .total_cmp(&a.risk_score_mean)
            .then_with(|| a.state.cmp(&b.state))
    });

    aggregates
}

/// Load state aggregates from a JSON array
pub fn load_state_aggregates(path: &Path) -> Result<Vec<StateAggregate>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read state aggregates: {}", path.display()))?;
    let aggregates: Vec<StateAggregate> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse state aggregates: {}", path.display()))?;
    tracing::debug!(count = aggregates.len(), "loaded state aggregates");
    Ok(aggregates)
}
