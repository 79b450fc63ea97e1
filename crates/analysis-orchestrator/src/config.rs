//! Engine configuration.
//!
//! Every table has a `Default` carrying the production constants; a JSON file
//! only needs the fields it overrides.

use analysis_core::AnalysisError;
use fundamental_analysis::{FactorConfig, ValuationConfig};
use quant_analysis::HistoryConfig;
use sentiment_analysis::SentimentConfig;
use serde::{Deserialize, Serialize};

use crate::recommendation::RecommendationConfig;

/// Upper bound on the owner-earnings projection horizon
const MAX_PROJECTION_YEARS: u32 = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub factors: FactorConfig,
    pub valuation: ValuationConfig,
    pub history: HistoryConfig,
    pub sentiment: SentimentConfig,
    pub recommendation: RecommendationConfig,
}

fn check_weight(name: &str, value: f64) -> Result<(), AnalysisError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AnalysisError::InvalidConfig(format!(
            "{} must be a finite, non-negative weight (got {})",
            name, value
        )));
    }
    Ok(())
}

fn check_range(name: &str, min: f64, max: f64) -> Result<(), AnalysisError> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(AnalysisError::InvalidConfig(format!(
            "{} range is inverted or non-finite ({} > {})",
            name, min, max
        )));
    }
    Ok(())
}

impl AnalysisConfig {
    /// Parse a (partial) JSON config and validate it
    pub fn from_json_str(json: &str) -> Result<Self, AnalysisError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (name, weight) in self.factors.weights() {
            check_weight(name, weight)?;
        }
        if self.factors.risk.red_flag_divisor <= 0.0 {
            return Err(AnalysisError::InvalidConfig(
                "risk.red_flag_divisor must be positive".to_string(),
            ));
        }

        let v = &self.valuation;
        check_range("valuation growth", v.min_growth, v.max_growth)?;
        check_range("valuation pe moat", v.pe_moat_min, v.pe_moat_max)?;
        check_range("valuation pe", v.min_pe, v.max_pe)?;
        check_range("valuation pb", v.min_pb, v.max_pb)?;
        if !(v.discount_rate > 0.0) {
            return Err(AnalysisError::InvalidConfig(
                "valuation.discount_rate must be positive".to_string(),
            ));
        }
        if !(v.max_projection_growth.is_finite() && v.max_projection_growth >= 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "valuation.max_projection_growth must be finite and non-negative (got {})",
                v.max_projection_growth
            )));
        }
        if v.projection_years > MAX_PROJECTION_YEARS {
            return Err(AnalysisError::InvalidConfig(format!(
                "valuation.projection_years must be at most {} (got {})",
                MAX_PROJECTION_YEARS, v.projection_years
            )));
        }
        let blend = [
            ("weights.graham", v.weights.graham),
            ("weights.earnings_power", v.weights.earnings_power),
            ("weights.owner_earnings", v.weights.owner_earnings),
            ("weights.book_anchor", v.weights.book_anchor),
        ];
        for (name, weight) in blend {
            check_weight(name, weight)?;
        }
        // Every present subset needs a positive total, so each model needs its own weight
        if blend.iter().any(|(_, w)| *w <= 0.0) {
            return Err(AnalysisError::InvalidConfig(
                "every valuation blend weight must be positive".to_string(),
            ));
        }

        if self.history.min_samples < 2 || !(self.history.periods_per_year > 0.0) {
            return Err(AnalysisError::InvalidConfig(
                "history needs min_samples >= 2 and positive periods_per_year".to_string(),
            ));
        }

        let s = &self.sentiment;
        if s.min_news_items > s.max_news_items {
            return Err(AnalysisError::InvalidConfig(format!(
                "sentiment news item range is inverted ({} > {})",
                s.min_news_items, s.max_news_items
            )));
        }

        let r = &self.recommendation;
        let w = &r.weights;
        for (name, weight) in [
            ("recommendation.margin_of_safety", w.margin_of_safety),
            ("recommendation.moat", w.moat),
            ("recommendation.quality", w.quality),
            ("recommendation.predictability", w.predictability),
            ("recommendation.management", w.management),
            ("recommendation.risk", w.risk),
            ("recommendation.sentiment", w.sentiment),
        ] {
            check_weight(name, weight)?;
        }
        let t = &r.thresholds;
        if !(t.strong_buy >= t.buy && t.buy >= t.hold && t.hold >= t.reduce) {
            return Err(AnalysisError::InvalidConfig(
                "recommendation thresholds must be descending".to_string(),
            ));
        }

        Ok(())
    }
}
