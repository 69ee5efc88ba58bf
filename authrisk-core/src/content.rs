//! Compiled-in report content
//!
//! Read-only reference text shown alongside computed results. Nothing here
//! is derived from data.

use crate::risk::{RiskLevel, LEVEL_BANDS};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReportMeta {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub authors: &'static [&'static str],
    pub date: &'static str,
}

pub const REPORT_META: ReportMeta = ReportMeta {
    title: "Predictive Analysis of Aadhaar Biometric Authentication Failures",
    subtitle: "UIDAI Data Hackathon 2026",
    authors: &["Karan Sharma", "Adit Hajre", "Soham Sandip Mhatre"],
    date: "January 20, 2026",
};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DatasetInfo {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Narrative {
    pub problem: &'static [&'static str],
    pub approach: &'static [&'static str],
    pub datasets: &'static [DatasetInfo],
    pub focus: &'static str,
}

pub const NARRATIVE: Narrative = Narrative {
    problem: &[
        "Aadhaar biometric authentication is a primary identity verification mode for welfare and essential services.",
        "In practice, biometric authentication can fail due to worn fingerprints, aging-related degradation, sensor quality issues, or adverse operating environments.",
        "Failures can trigger demographic fallback authentication, repeated retries, friction, and potential service denial.",
    ],
    approach: &[
        "Public UIDAI datasets do not explicitly label failures, so we infer biometric stress using indirect but observable signals.",
        "We model biometric stress using three dimensions: (i) loss of biometric dominance, (ii) increased reliance on demographic fallback, and (iii) elevated authentication intensity (retry loops).",
        "We compute a composite risk score aggregated at date × state × district × pincode to identify high-risk regions proactively.",
    ],
    datasets: &[
        DatasetInfo {
            name: "Biometric Authentication Dataset",
            description: "Age-wise counts of successful biometric authentications; used to measure biometric dominance and coverage.",
        },
        DatasetInfo {
            name: "Demographic Authentication Dataset",
            description: "Authentication events via demographic attributes when biometrics are not used; proxy for fallback dependency and biometric stress.",
        },
        DatasetInfo {
            name: "Enrolment Dataset",
            description: "Age-wise enrolment counts; used for normalization and population-relative indicators (authentication intensity).",
        },
    ],
    focus: "The analysis focuses on the 18+ age group due to higher usage and higher biometric variability.",
};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricDefinition {
    pub symbol: &'static str,
    pub meaning: &'static str,
}

pub const METRIC_DEFINITIONS: &[MetricDefinition] = &[
    MetricDefinition {
        symbol: "B18+",
        meaning: "Biometric authentications for 18+",
    },
    MetricDefinition {
        symbol: "D18+",
        meaning: "Demographic (fallback) authentications for 18+",
    },
    MetricDefinition {
        symbol: "E18+",
        meaning: "Enrolled population (18+)",
    },
    MetricDefinition {
        symbol: "T18+",
        meaning: "Total authentication demand = B18+ + D18+",
    },
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Formula {
    pub name: &'static str,
    pub formula: &'static str,
}

pub const FORMULAS: &[Formula] = &[
    Formula {
        name: "Biometric Share",
        formula: "B18+ / T18+",
    },
    Formula {
        name: "Fallback Dependency Ratio",
        formula: "D18+ / T18+",
    },
    Formula {
        name: "Authentication Intensity",
        formula: "T18+ / E18+",
    },
];

pub const RISK_SCORE_FORMULA: &str = "Risk Score = 0.5 × Fallback Dependency Ratio + 0.3 × (1 − Biometric Share) + 0.2 × Normalized Authentication Intensity";

/// One row of the operational playbook
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RiskCategory {
    pub level: RiskLevel,
    pub range: &'static str,
    pub action: &'static str,
}

/// Playbook rows, read straight from the classification table
pub fn risk_categories() -> Vec<RiskCategory> {
    LEVEL_BANDS
        .iter()
        .map(|band| RiskCategory {
            level: band.level,
            range: band.range_label,
            action: band.action,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Figure {
    pub id: &'static str,
    pub title: &'static str,
    pub caption: &'static str,
    pub src: &'static str,
}

pub const FIGURES: &[Figure] = &[
    Figure {
        id: "fig1",
        title: "Distribution of Aadhaar Biometric Risk Levels (18+)",
        caption: "A significant proportion of pincodes fall under medium and high risk categories, highlighting the need for proactive authentication planning.",
        src: "/figures/output_1.png",
    },
    Figure {
        id: "fig2",
        title: "Fallback dependency ratio vs risk score",
        caption: "Higher reliance on demographic authentication strongly correlates with increased biometric stress, validating fallback usage as a primary failure proxy.",
        src: "/figures/output_2.png",
    },
    Figure {
        id: "fig3",
        title: "Biometric share vs risk score",
        caption: "Inverse relationship between biometric share and biometric failure risk; regions with higher biometric dominance exhibit lower failure risk.",
        src: "/figures/output_3.png",
    },
    Figure {
        id: "fig4",
        title: "Authentication intensity vs risk score",
        caption: "Elevated intensity indicates retry loops and authentication friction, contributing to higher observed biometric stress.",
        src: "/figures/output_4.png",
    },
    Figure {
        id: "fig5",
        title: "Average biometric failure risk score by state",
        caption: "Significant regional variation enables targeted interventions (infrastructure upgrades, proactive alternate authentication).",
        src: "/figures/output_5.png",
    },
];

/// Look up a figure by id (case-insensitive); unknown or missing ids give the first figure
pub fn select_figure(id: Option<&str>) -> &'static Figure {
    id.and_then(|id| FIGURES.iter().find(|f| f.id.eq_ignore_ascii_case(id.trim())))
        .unwrap_or(&FIGURES[0])
}
