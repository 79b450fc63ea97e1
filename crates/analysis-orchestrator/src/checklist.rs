//! Value-investing checklist derived from a finished report.

use analysis_core::FactorScores;
use serde::{Deserialize, Serialize};

const MIN_MARGIN_OF_SAFETY: f64 = 0.25;
const MIN_QUALITY: f64 = 0.25;
const MIN_MOAT: f64 = 0.20;
const MIN_RISK: f64 = 0.0;
const MIN_PREDICTABILITY: f64 = 0.10;

/// Qualitative items that no data feed can settle
pub const MANUAL_CHECKS: &[(&str, &str)] = &[
    ("Circle of competence", "MANUAL CHECK"),
    ("Incentives/management", "PARTIAL (proxy only)"),
    ("Opportunity-cost ranking", "MANUAL CHECK"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    Pass,
    Warn,
}

impl CheckStatus {
    fn from_bool(passed: bool) -> Self {
        if passed {
            CheckStatus::Pass
        } else {
            CheckStatus::Warn
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "PASS",
            CheckStatus::Warn => "WARN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub label: String,
    pub status: CheckStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub items: Vec<ChecklistItem>,
}

impl Checklist {
    pub fn evaluate(margin_of_safety: Option<f64>, factors: &FactorScores) -> Self {
        let checks = [
            (
                "Margin of safety >= 25%",
                margin_of_safety.is_some_and(|m| m >= MIN_MARGIN_OF_SAFETY),
            ),
            ("High quality economics", factors.quality >= MIN_QUALITY),
            ("Durable moat indicators", factors.moat >= MIN_MOAT),
            ("Balance-sheet prudence", factors.risk >= MIN_RISK),
            ("Predictable compounding", factors.predictability >= MIN_PREDICTABILITY),
        ];
        Self {
            items: checks
                .iter()
                .map(|(label, passed)| ChecklistItem {
                    label: label.to_string(),
                    status: CheckStatus::from_bool(*passed),
                })
                .collect(),
        }
    }

    pub fn passed(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.status == CheckStatus::Pass)
            .count()
    }
}
