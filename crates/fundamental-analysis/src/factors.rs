//! Factor scoring: moat, quality, predictability, management and risk.
//!
//! Each factor is a sum of `band(metric) * weight` terms over the metrics that
//! are present. An absent metric simply drops its term; the remaining weights
//! are not rescaled, so sparse data pulls a factor towards zero. Every factor
//! is clamped to [-1, 1].

use analysis_core::scoring::{band, clamp};
use analysis_core::{CanonicalMetrics, FactorScores, HistoryStats, SentimentResult};
use serde::{Deserialize, Serialize};

/// One weighted band term of a factor score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandTerm {
    pub low: f64,
    pub high: f64,
    pub weight: f64,
}

impl BandTerm {
    pub const fn new(low: f64, high: f64, weight: f64) -> Self {
        Self { low, high, weight }
    }

    /// Weighted band contribution, or 0.0 when the input is absent
    pub fn contribution(&self, value: Option<f64>) -> f64 {
        value.map_or(0.0, |v| band(v, self.low, self.high) * self.weight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoatConfig {
    pub gross_margin: BandTerm,
    pub oper_margin: BandTerm,
    pub roe: BandTerm,
}

impl Default for MoatConfig {
    fn default() -> Self {
        Self {
            gross_margin: BandTerm::new(0.20, 0.60, 0.30),
            oper_margin: BandTerm::new(0.07, 0.30, 0.35),
            roe: BandTerm::new(0.08, 0.25, 0.35),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    pub roe: BandTerm,
    pub roic: BandTerm,
    /// Leverage is scored as `leverage_pivot - debt_to_equity`
    pub leverage_pivot: f64,
    pub leverage: BandTerm,
    pub current_ratio: BandTerm,
    pub interest_cover: BandTerm,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            roe: BandTerm::new(0.08, 0.22, 0.30),
            roic: BandTerm::new(0.07, 0.20, 0.30),
            leverage_pivot: 1.5,
            leverage: BandTerm::new(0.0, 1.3, 0.20),
            current_ratio: BandTerm::new(1.0, 2.2, 0.10),
            interest_cover: BandTerm::new(2.0, 10.0, 0.10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictabilityConfig {
    pub growth: BandTerm,
    /// Scored on the drawdown magnitude (`-max_drawdown`)
    pub drawdown: BandTerm,
    /// Volatility is scored as `volatility_ceiling - volatility`
    pub volatility_ceiling: f64,
    pub volatility: BandTerm,
    pub positive_months: BandTerm,
}

impl Default for PredictabilityConfig {
    fn default() -> Self {
        Self {
            growth: BandTerm::new(0.02, 0.15, 0.35),
            drawdown: BandTerm::new(0.15, 0.55, 0.25),
            volatility_ceiling: 0.20,
            volatility: BandTerm::new(-0.05, 0.16, 0.20),
            positive_months: BandTerm::new(0.45, 0.70, 0.20),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagementConfig {
    pub roic: BandTerm,
    pub dividend_yield: BandTerm,
    pub leverage_pivot: f64,
    pub leverage: BandTerm,
    /// Sentiment enters unscaled
    pub sentiment_weight: f64,
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            roic: BandTerm::new(0.07, 0.18, 0.40),
            dividend_yield: BandTerm::new(0.0, 0.04, 0.10),
            leverage_pivot: 1.2,
            leverage: BandTerm::new(0.0, 1.0, 0.25),
            sentiment_weight: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Red-flag hits are divided by this before capping
    pub red_flag_divisor: f64,
    pub red_flag_cap: f64,
    pub leverage_pivot: f64,
    pub leverage: BandTerm,
    pub drawdown: BandTerm,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            red_flag_divisor: 30.0,
            red_flag_cap: 0.4,
            leverage_pivot: 1.4,
            leverage: BandTerm::new(-0.8, 1.2, 0.35),
            drawdown: BandTerm::new(0.10, 0.55, 0.25),
        }
    }
}

/// Band and weight tables for all five factors
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorConfig {
    pub moat: MoatConfig,
    pub quality: QualityConfig,
    pub predictability: PredictabilityConfig,
    pub management: ManagementConfig,
    pub risk: RiskConfig,
}

impl FactorConfig {
    /// All weights, for validation
    pub fn weights(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("moat.gross_margin", self.moat.gross_margin.weight),
            ("moat.oper_margin", self.moat.oper_margin.weight),
            ("moat.roe", self.moat.roe.weight),
            ("quality.roe", self.quality.roe.weight),
            ("quality.roic", self.quality.roic.weight),
            ("quality.leverage", self.quality.leverage.weight),
            ("quality.current_ratio", self.quality.current_ratio.weight),
            ("quality.interest_cover", self.quality.interest_cover.weight),
            ("predictability.growth", self.predictability.growth.weight),
            ("predictability.drawdown", self.predictability.drawdown.weight),
            ("predictability.volatility", self.predictability.volatility.weight),
            ("predictability.positive_months", self.predictability.positive_months.weight),
            ("management.roic", self.management.roic.weight),
            ("management.dividend_yield", self.management.dividend_yield.weight),
            ("management.leverage", self.management.leverage.weight),
            ("management.sentiment_weight", self.management.sentiment_weight),
            ("risk.leverage", self.risk.leverage.weight),
            ("risk.drawdown", self.risk.drawdown.weight),
            ("risk.red_flag_cap", self.risk.red_flag_cap),
        ]
    }
}

/// Computes the five factor scores from one shared configuration
#[derive(Debug, Clone, Default)]
pub struct FactorScorer {
    config: FactorConfig,
}

impl FactorScorer {
    pub fn new(config: FactorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FactorConfig {
        &self.config
    }

    pub fn score(
        &self,
        metrics: &CanonicalMetrics,
        history: &HistoryStats,
        sentiment: &SentimentResult,
    ) -> FactorScores {
        let scores = FactorScores {
            moat: self.moat(metrics),
            quality: self.quality(metrics),
            predictability: self.predictability(history),
            management: self.management(metrics, sentiment.score),
            risk: self.risk(sentiment.red_flag_hits, metrics.debt_to_equity, history.max_drawdown),
        };
        tracing::debug!(
            "Factor scores: moat={:.3} quality={:.3} predictability={:.3} management={:.3} risk={:.3}",
            scores.moat,
            scores.quality,
            scores.predictability,
            scores.management,
            scores.risk
        );
        scores
    }

    pub fn moat(&self, metrics: &CanonicalMetrics) -> f64 {
        let cfg = &self.config.moat;
        let score = cfg.gross_margin.contribution(metrics.gross_margin)
            + cfg.oper_margin.contribution(metrics.oper_margin)
            + cfg.roe.contribution(metrics.roe);
        clamp(score, -1.0, 1.0)
    }

    pub fn quality(&self, metrics: &CanonicalMetrics) -> f64 {
        let cfg = &self.config.quality;
        let score = cfg.roe.contribution(metrics.roe)
            + cfg.roic.contribution(metrics.roic)
            + cfg
                .leverage
                .contribution(metrics.debt_to_equity.map(|d| cfg.leverage_pivot - d))
            + cfg.current_ratio.contribution(metrics.current_ratio)
            + cfg.interest_cover.contribution(metrics.interest_cover);
        clamp(score, -1.0, 1.0)
    }

    pub fn predictability(&self, history: &HistoryStats) -> f64 {
        let cfg = &self.config.predictability;
        let score = cfg.growth.contribution(history.growth)
            + cfg.drawdown.contribution(history.max_drawdown.map(|d| -d))
            + cfg
                .volatility
                .contribution(history.volatility.map(|v| cfg.volatility_ceiling - v))
            + cfg.positive_months.contribution(history.positive_month_ratio);
        clamp(score, -1.0, 1.0)
    }

    pub fn management(&self, metrics: &CanonicalMetrics, sentiment: f64) -> f64 {
        let cfg = &self.config.management;
        let score = cfg.roic.contribution(metrics.roic)
            + cfg.dividend_yield.contribution(metrics.dividend_yield)
            + cfg
                .leverage
                .contribution(metrics.debt_to_equity.map(|d| cfg.leverage_pivot - d))
            + sentiment * cfg.sentiment_weight;
        clamp(score, -1.0, 1.0)
    }

    pub fn risk(&self, red_flag_hits: usize, debt_to_equity: Option<f64>, max_drawdown: Option<f64>) -> f64 {
        let cfg = &self.config.risk;
        let mut score = 0.0;
        if red_flag_hits > 0 && cfg.red_flag_divisor > 0.0 {
            score -= clamp(red_flag_hits as f64 / cfg.red_flag_divisor, 0.0, cfg.red_flag_cap);
        }
        score += cfg
            .leverage
            .contribution(debt_to_equity.map(|d| cfg.leverage_pivot - d));
        score += cfg.drawdown.contribution(max_drawdown.map(|d| -d));
        clamp(score, -1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn strong_metrics() -> CanonicalMetrics {
        CanonicalMetrics {
            roe: Some(0.30),
            roic: Some(0.25),
            gross_margin: Some(0.70),
            oper_margin: Some(0.35),
            debt_to_equity: Some(0.1),
            current_ratio: Some(3.0),
            interest_cover: Some(20.0),
            dividend_yield: Some(0.05),
            ..Default::default()
        }
    }

    #[test]
    fn test_all_absent_scores_zero() {
        let scorer = FactorScorer::default();
        let scores = scorer.score(
            &CanonicalMetrics::default(),
            &HistoryStats::default(),
            &SentimentResult::default(),
        );
        assert_eq!(scores, FactorScores::default());
    }

    #[test]
    fn test_saturated_metrics_hit_weight_sums() {
        let scorer = FactorScorer::default();
        let metrics = strong_metrics();
        assert_abs_diff_eq!(scorer.moat(&metrics), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scorer.quality(&metrics), 1.0, epsilon = 1e-12);
        // roic + dividend + leverage = 0.75; sentiment 1.0 adds the last 0.25
        assert_abs_diff_eq!(scorer.management(&metrics, 0.0), 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(scorer.management(&metrics, 1.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_absent_weights_are_not_renormalized() {
        let scorer = FactorScorer::default();
        let metrics = CanonicalMetrics {
            gross_margin: Some(0.90),
            ..Default::default()
        };
        // Only the gross margin term survives, at its own weight
        assert_abs_diff_eq!(scorer.moat(&metrics), 0.30, epsilon = 1e-12);
    }

    #[test]
    fn test_moat_midpoints() {
        let scorer = FactorScorer::default();
        let metrics = CanonicalMetrics {
            gross_margin: Some(0.40),
            oper_margin: Some(0.185),
            roe: Some(0.165),
            ..Default::default()
        };
        assert_abs_diff_eq!(scorer.moat(&metrics), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_predictability_from_history() {
        let scorer = FactorScorer::default();
        let calm = HistoryStats {
            growth: Some(0.20),
            max_drawdown: Some(-0.05),
            volatility: Some(0.01),
            positive_month_ratio: Some(0.80),
        };
        // A shallow drawdown sits below the 0.15 band and scores -1 on that term
        assert_abs_diff_eq!(scorer.predictability(&calm), 0.35 - 0.25 + 0.20 + 0.20, epsilon = 1e-12);

        let rough = HistoryStats {
            growth: Some(-0.10),
            max_drawdown: Some(-0.70),
            volatility: Some(0.30),
            positive_month_ratio: Some(0.30),
        };
        assert_abs_diff_eq!(scorer.predictability(&rough), -0.35 + 0.25 - 0.20 - 0.20, epsilon = 1e-12);
    }

    #[test]
    fn test_risk_red_flag_penalty_is_capped() {
        let scorer = FactorScorer::default();
        assert_abs_diff_eq!(scorer.risk(3, None, None), -0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(scorer.risk(12, None, None), -0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(scorer.risk(500, None, None), -0.4, epsilon = 1e-12);
        assert_eq!(scorer.risk(0, None, None), 0.0);
    }

    #[test]
    fn test_risk_leverage_and_drawdown() {
        let scorer = FactorScorer::default();
        // 1.4 - 0.2 = 1.2 saturates the leverage band; 0.55 drawdown saturates the other
        assert_abs_diff_eq!(scorer.risk(0, Some(0.2), Some(-0.55)), 0.60, epsilon = 1e-12);
        assert_abs_diff_eq!(scorer.risk(0, Some(3.0), Some(-0.05)), -0.60, epsilon = 1e-12);
    }

    #[test]
    fn test_scores_stay_bounded() {
        let scorer = FactorScorer::default();
        let extremes = [-1e9, -10.0, -1.0, 0.0, 0.5, 1.0, 10.0, 1e9];
        for &x in &extremes {
            let metrics = CanonicalMetrics {
                eps: Some(x),
                bvps: Some(x),
                roe: Some(x),
                roic: Some(x),
                gross_margin: Some(x),
                oper_margin: Some(x),
                debt_to_equity: Some(x),
                current_ratio: Some(x),
                interest_cover: Some(x),
                dividend_yield: Some(x),
                ..Default::default()
            };
            let history = HistoryStats {
                growth: Some(x),
                max_drawdown: Some(-x.abs()),
                volatility: Some(x.abs()),
                positive_month_ratio: Some(x),
            };
            let sentiment = SentimentResult {
                score: clamp(x, -1.0, 1.0),
                items_scored: 1,
                red_flag_hits: x.abs().min(1e6) as usize,
            };
            let scores = scorer.score(&metrics, &history, &sentiment);
            for value in [scores.moat, scores.quality, scores.predictability, scores.management, scores.risk] {
                assert!((-1.0..=1.0).contains(&value), "score {} out of range for x={}", value, x);
            }
        }
    }

    #[test]
    fn test_degenerate_band_contributes_nothing() {
        let mut config = FactorConfig::default();
        config.moat.roe = BandTerm::new(0.25, 0.08, 0.35);
        let scorer = FactorScorer::new(config);
        let metrics = CanonicalMetrics {
            roe: Some(0.50),
            ..Default::default()
        };
        assert_eq!(scorer.moat(&metrics), 0.0);
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: FactorConfig =
            serde_json::from_str(r#"{"risk": {"red_flag_cap": 0.2}}"#).unwrap();
        assert_eq!(config.risk.red_flag_cap, 0.2);
        assert_eq!(config.risk.red_flag_divisor, 30.0);
        assert_eq!(config.moat, MoatConfig::default());
    }
}
