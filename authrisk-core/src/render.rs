//! Text and JSON output
//!
//! Global invariants enforced:
//! - Deterministic output ordering
//! - Byte-for-byte identical output for identical input

use crate::assessment::{LevelDistribution, PincodeAssessment};
use crate::content::{self, Figure};
use crate::regions::RegionRisk;
use crate::risk::{self, RiskAssessment};
use crate::ticker::TickerSnapshot;
use anyhow::Result;
use serde::Serialize;

/// Render any serializable value as pretty JSON
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Render one what-if assessment
pub fn render_assessment_text(assessment: &RiskAssessment) -> String {
    let mut output = String::new();
    let s = &assessment.signals;
    let w = &assessment.weights;

    output.push_str("Inputs:\n");
    output.push_str(&format!(
        "  Fallback Dependency Ratio   {:.2}\n",
        s.fallback_ratio
    ));
    output.push_str(&format!(
        "  Biometric Share             {:.2}\n",
        s.biometric_share
    ));
    output.push_str(&format!(
        "  Normalized Auth Intensity   {:.2}\n",
        s.norm_intensity
    ));
    output.push('\n');
    output.push_str(&format!(
        "Weights (normalized): fallback {:.2} · loss {:.2} · intensity {:.2}\n",
        w.fallback, w.loss, w.intensity
    ));
    output.push_str(&format!("{}\n", risk::formula_text(w)));
    output.push('\n');
    output.push_str(&format!(
        "Composite Risk Score: {:.3}  ({} risk)\n",
        assessment.score, assessment.level
    ));
    output.push_str(&format!("Score bar: {}\n", score_bar(assessment.score, 40)));
    output.push_str(&format!("Recommended action: {}\n", assessment.action));
    output
}

/// Fixed-width bar with tick marks at the level thresholds
fn score_bar(score: f64, width: usize) -> String {
    let filled = (score.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!(
        "[{}{}] 0.0 | 0.3 | 0.6 | 1.0",
        "#".repeat(filled),
        "-".repeat(width - filled)
    )
}

/// Render pincode assessments as a table
pub fn render_assessments_text(assessments: &[PincodeAssessment]) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:<7} {:<7} {:<20} {:<20} {:<8} {:<11} {}\n",
        "SCORE", "LEVEL", "STATE", "DISTRICT", "PINCODE", "DATE", "ACTION"
    ));
    for a in assessments {
        output.push_str(&format!(
            "{:<7} {:<7} {:<20} {:<20} {:<8} {:<11} {}\n",
            format!("{:.3}", a.score),
            a.level.as_str(),
            truncate_or_pad(&a.state, 20),
            truncate_or_pad(&a.district, 20),
            a.pincode,
            a.date,
            a.action,
        ));
    }
    output
}

/// Render the level histogram
pub fn render_distribution_text(dist: &LevelDistribution) -> String {
    let mut output = format!("Risk level distribution ({} records):\n", dist.total);
    for c in &dist.levels {
        output.push_str(&format!(
            "  {:<7} {:>6}  {:>5.1}%\n",
            c.level.as_str(),
            c.count,
            c.share * 100.0
        ));
    }
    output
}

/// Render classified regions as a table
pub fn render_regions_text(regions: &[RegionRisk]) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:<24} {:<7} {:<7} {:<9} {}\n",
        "STATE", "MEAN", "LEVEL", "PINCODES", "ACTION"
    ));
    for r in regions {
        output.push_str(&format!(
            "{:<24} {:<7} {:<7} {:<9} {}\n",
            truncate_or_pad(&r.state, 24),
            format!("{:.3}", r.risk_score_mean),
            r.level.as_str(),
            r.pincodes,
            r.tooltip_action
        ));
    }
    output
}

/// Render one region the way the map tooltip shows it
pub fn render_region_detail(region: &RegionRisk) -> String {
    format!(
        "{}\n  Risk score: {:.3} ({})\n  Pincodes: {}\n  UIDAI action: {}\n",
        region.state,
        region.risk_score_mean,
        region.level,
        region.pincodes,
        region.tooltip_action
    )
}

/// Render the static report: metadata, narrative, methodology, playbook
pub fn render_report_text(weights: &risk::NormalizedWeights) -> String {
    let meta = content::REPORT_META;
    let narrative = content::NARRATIVE;
    let mut output = String::new();

    output.push_str(&format!("{}\n", meta.title));
    output.push_str(&format!(
        "{} · {} · {}\n",
        meta.subtitle,
        meta.authors.join(", "),
        meta.date
    ));

    output.push_str("\nProblem\n");
    for p in narrative.problem {
        output.push_str(&format!("  - {}\n", p));
    }
    output.push_str("\nApproach (weak supervision)\n");
    for p in narrative.approach {
        output.push_str(&format!("  - {}\n", p));
    }

    output.push_str("\nDatasets\n");
    for ds in narrative.datasets {
        output.push_str(&format!("  {}: {}\n", ds.name, ds.description));
    }
    output.push_str(&format!("  Focus: {}\n", narrative.focus));

    output.push_str("\nDefinitions\n");
    for d in content::METRIC_DEFINITIONS {
        output.push_str(&format!("  {:<5} {}\n", d.symbol, d.meaning));
    }
    output.push_str("\nFormulas\n");
    for f in content::FORMULAS {
        output.push_str(&format!("  {:<26} {}\n", f.name, f.formula));
    }
    output.push_str(&format!("  {}\n", content::RISK_SCORE_FORMULA));
    output.push_str(&format!("  Active: {}\n", risk::formula_text(weights)));

    output.push_str("\nOperational playbook\n");
    for c in content::risk_categories() {
        output.push_str(&format!(
            "  {:<7} {:<18} {}\n",
            c.level.as_str(),
            c.range,
            c.action
        ));
    }

    output
}

/// Render the figure list, marking the selected figure and showing its caption
pub fn render_figures_text(selected: &Figure) -> String {
    let mut output = String::new();
    for f in content::FIGURES {
        let marker = if f.id == selected.id { ">" } else { " " };
        output.push_str(&format!(
            "{} {:<5} {}\n",
            marker,
            f.id.to_uppercase(),
            f.title
        ));
    }
    output.push_str(&format!(
        "\n{}\n{}\n{}\n",
        selected.title, selected.src, selected.caption
    ));
    output
}

/// Render one ticker frame; always labelled as simulated
pub fn render_ticker_text(snapshot: &TickerSnapshot) -> String {
    format!(
        "[simulated] t={} ts={}ms  auth {:.0}/sec  retry index {:.2}  mix L {:.0}% M {:.0}% H {:.0}%",
        snapshot.tick,
        snapshot.timestamp_ms,
        snapshot.auth_per_sec,
        snapshot.retry_index,
        snapshot.mix.low * 100.0,
        snapshot.mix.medium * 100.0,
        snapshot.mix.high * 100.0,
    )
}

/// Truncate or pad string to fixed width (char-aware)
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        format!("{:<width$}", s, width = width)
    }
}
