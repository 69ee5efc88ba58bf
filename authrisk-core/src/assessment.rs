//! Batch assessment of pincode records
//!
//! Global invariants enforced:
//! - Every record is scored with the same normalized weights
//! - Deterministic output ordering
//! - Records are never mutated

use crate::risk::{self, RiskLevel, RiskSignals, RiskWeights};
use crate::signals::{self, PincodeRecord};
use serde::{Deserialize, Serialize};

/// Scored and classified pincode record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PincodeAssessment {
    pub date: String,
    pub state: String,
    pub district: String,
    pub pincode: String,
    pub signals: RiskSignals,
    pub score: f64,
    pub level: RiskLevel,
    pub action: String,
}

/// Count and share of records at one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelCount {
    pub level: RiskLevel,
    pub count: usize,
    pub share: f64,
}

/// Level histogram over a batch, ordered Low, Medium, High
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDistribution {
    pub total: usize,
    pub levels: Vec<LevelCount>,
}

impl LevelDistribution {
    pub fn count(&self, level: RiskLevel) -> usize {
        self.levels
            .iter()
            .find(|c| c.level == level)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    pub fn share(&self, level: RiskLevel) -> f64 {
        self.levels
            .iter()
            .find(|c| c.level == level)
            .map(|c| c.share)
            .unwrap_or(0.0)
    }
}

/// Score every record in the batch
///
/// Intensity is normalized across the whole batch, so adding or removing a
/// record can move the scores of the others.
pub fn assess_records(records: &[PincodeRecord], weights: &RiskWeights) -> Vec<PincodeAssessment> {
    let normalized = weights.normalized();
    let derived = signals::derive_signals(records);

    let assessments = records
        .iter()
        .zip(derived)
        .map(|(record, signals)| {
            let score = risk::compute_risk_score(&signals, &normalized);
            let (level, action) = risk::classify_risk_level(score);
            PincodeAssessment {
                date: record.date.clone(),
                state: record.state.clone(),
                district: record.district.clone(),
                pincode: record.pincode.clone(),
                signals,
                score,
                level,
                action: action.to_string(),
            }
        })
        .collect();

    sort_assessments(assessments)
}

/// Sort assessments deterministically
pub fn sort_assessments(mut assessments: Vec<PincodeAssessment>) -> Vec<PincodeAssessment> {
    assessments.sort_by(|a, b| {
        // 1. Score descending
        b.score
            .total_cmp(&a.score)
            // 2. State, district, pincode ascending
            .then_with(|| a.state.cmp(&b.state))
            .then_with(|| a.district.cmp(&b.district))
            .then_with(|| a.pincode.cmp(&b.pincode))
            // 3. Date ascending
            .then_with(|| a.date.cmp(&b.date))
    });
    assessments
}

/// Count records per level
pub fn level_distribution(levels: impl IntoIterator<Item = RiskLevel>) -> LevelDistribution {
    let mut counts = [0usize; 3];
    for level in levels {
        counts[level as usize] += 1;
    }
    let total: usize = counts.iter().sum();

    let levels = RiskLevel::ALL
        .iter()
        .map(|&level| {
            let count = counts[level as usize];
            LevelCount {
                level,
                count,
                share: if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                },
            }
        })
        .collect();

    LevelDistribution { total, levels }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pincode: &str, b: u64, d: u64, e: u64) -> PincodeRecord {
        PincodeRecord {
            date: "2026-01-01".to_string(),
            state: "Bihar".to_string(),
            district: "Patna".to_string(),
            pincode: pincode.to_string(),
            biometric: b,
            demographic: d,
            enrolled: e,
        }
    }

    #[test]
    fn test_assess_orders_by_score() {
        let records = vec![
            record("800001", 95, 5, 100),
            record("800002", 20, 80, 20),
            record("800003", 60, 40, 50),
        ];
        let out = assess_records(&records, &RiskWeights::default());
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].pincode, "800002");
        assert_eq!(out[2].pincode, "800001");
        for pair in out.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_assess_high_stress_record() {
        // Only record with demand: fallback 0.8, share 0.2, intensity normalizes to 1.0
        let records = vec![record("800002", 20, 80, 20), record("800009", 0, 0, 10)];
        let out = assess_records(&records, &RiskWeights::default());
        let top = &out[0];
        assert_eq!(top.pincode, "800002");
        // 0.5*0.8 + 0.3*0.8 + 0.2*1.0 = 0.84
        assert!((top.score - 0.84).abs() < 1e-9);
        assert_eq!(top.level, RiskLevel::High);
    }

    #[test]
    fn test_tie_breaks_by_location() {
        let records = vec![record("800005", 50, 50, 100), record("800004", 50, 50, 100)];
        let out = assess_records(&records, &RiskWeights::default());
        assert_eq!(out[0].pincode, "800004");
        assert_eq!(out[1].pincode, "800005");
    }

    #[test]
    fn test_sort_with_nan_score_is_total() {
        let mut scored = assess_records(
            &[record("800001", 95, 5, 100), record("800002", 20, 80, 20)],
            &RiskWeights::default(),
        );
        let mut nan = scored[1].clone();
        nan.pincode = "800003".to_string();
        nan.score = f64::NAN;
        scored.push(nan);

        let forward = sort_assessments(scored.clone());
        scored.reverse();
        let backward = sort_assessments(scored);

        let pins = |v: &[PincodeAssessment]| {
            v.iter().map(|a| a.pincode.clone()).collect::<Vec<_>>()
        };
        assert_eq!(pins(&forward), vec!["800003", "800002", "800001"]);
        assert_eq!(pins(&forward), pins(&backward));
    }

    #[test]
    fn test_level_distribution() {
        let dist = level_distribution([
            RiskLevel::Low,
            RiskLevel::Medium,
            RiskLevel::Medium,
            RiskLevel::High,
        ]);
        assert_eq!(dist.total, 4);
        assert_eq!(dist.count(RiskLevel::Medium), 2);
        assert!((dist.share(RiskLevel::High) - 0.25).abs() < 1e-12);
        assert_eq!(dist.levels[0].level, RiskLevel::Low);
    }

    #[test]
    fn test_level_distribution_empty() {
        let dist = level_distribution(Vec::new());
        assert_eq!(dist.total, 0);
        assert_eq!(dist.share(RiskLevel::Low), 0.0);
        assert_eq!(dist.levels.len(), 3);
    }
}
