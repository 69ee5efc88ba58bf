//! Integration tests for batch assessment over fixture files

use authrisk_core::regions::{find_region, load_state_aggregates};
use authrisk_core::render::{render_json, render_regions_text};
use authrisk_core::signals::load_records;
use authrisk_core::{classify_regions, run_batch, RiskLevel, RiskWeights};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_batch_ordering_and_scores() {
    let records = load_records(&fixture_path("pincodes.json")).unwrap();
    assert_eq!(records.len(), 5);

    let report = run_batch(&records, &RiskWeights::default(), None);
    let order: Vec<&str> = report.pincodes.iter().map(|a| a.pincode.as_str()).collect();
    assert_eq!(order, vec!["800001", "781001", "823001", "680001", "682001"]);

    let top = &report.pincodes[0];
    assert!((top.score - 0.84).abs() < 1e-9);
    assert_eq!(top.level, RiskLevel::High);
    assert_eq!(top.action, "Proactively enable OTP or Iris to prevent service denial");

    let bottom = &report.pincodes[4];
    assert!((bottom.score - 0.08).abs() < 1e-9);
    assert_eq!(bottom.level, RiskLevel::Low);
}

#[test]
fn test_batch_distribution() {
    let records = load_records(&fixture_path("pincodes.json")).unwrap();
    let report = run_batch(&records, &RiskWeights::default(), None);

    assert_eq!(report.distribution.total, 5);
    assert_eq!(report.distribution.count(RiskLevel::Low), 2);
    assert_eq!(report.distribution.count(RiskLevel::Medium), 1);
    assert_eq!(report.distribution.count(RiskLevel::High), 2);
}

#[test]
fn test_batch_state_means() {
    let records = load_records(&fixture_path("pincodes.json")).unwrap();
    let report = run_batch(&records, &RiskWeights::default(), None);

    let states: Vec<&str> = report.states.iter().map(|s| s.state.as_str()).collect();
    assert_eq!(states, vec!["Assam", "Bihar", "Kerala"]);

    let bihar = find_region(&report.states, "bihar").unwrap();
    assert_eq!(bihar.pincodes, 2);
    assert_eq!(bihar.level, RiskLevel::High);

    let kerala = find_region(&report.states, " Kerala ").unwrap();
    assert_eq!(kerala.level, RiskLevel::Low);
    assert_eq!(kerala.tooltip_action, "Normal biometric flow");
}

#[test]
fn test_top_n_truncates_listing_only() {
    let records = load_records(&fixture_path("pincodes.json")).unwrap();
    let report = run_batch(&records, &RiskWeights::default(), Some(2));

    assert_eq!(report.pincodes.len(), 2);
    assert_eq!(report.distribution.total, 5);
    assert_eq!(report.states.len(), 3);
}

#[test]
fn test_batch_json_is_deterministic() {
    let records = load_records(&fixture_path("pincodes.json")).unwrap();
    let a = render_json(&run_batch(&records, &RiskWeights::default(), None)).unwrap();
    let b = render_json(&run_batch(&records, &RiskWeights::default(), None)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_state_aggregates_boundaries() {
    let aggregates = load_state_aggregates(&fixture_path("states.json")).unwrap();
    let regions = classify_regions(&aggregates);

    let level = |name: &str| find_region(&regions, name).unwrap().level;
    assert_eq!(level("Uttar Pradesh"), RiskLevel::High);
    assert_eq!(level("Rajasthan"), RiskLevel::High);
    assert_eq!(level("Maharashtra"), RiskLevel::Medium);
    assert_eq!(level("Tamil Nadu"), RiskLevel::Medium);
    assert_eq!(level("Kerala"), RiskLevel::Low);
    assert_eq!(level("Goa"), RiskLevel::Low);

    assert_eq!(regions[0].state, "Uttar Pradesh");
    assert_eq!(regions[5].state, "Goa");

    let text = render_regions_text(&regions);
    assert!(text.contains("Proactively enable OTP/Iris"));
}

#[test]
fn test_missing_fixture_reports_path() {
    let err = load_records(&fixture_path("does-not-exist.json")).unwrap_err();
    assert!(format!("{:#}", err).contains("does-not-exist.json"));
}
