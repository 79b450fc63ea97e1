//! Intrinsic value estimation.
//!
//! Up to four per-share models are computed from EPS and book value, then
//! blended with fixed weights renormalized over the models that could actually
//! be computed. This is the opposite policy to factor scoring, where an
//! absent term keeps its share of the weight at zero.

use analysis_core::scoring::clamp;
use analysis_core::{CanonicalMetrics, ValuationModel, ValuationModels, ValuationResult};
use serde::{Deserialize, Serialize};

/// Blend weight per valuation model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendWeights {
    pub graham: f64,
    pub earnings_power: f64,
    pub owner_earnings: f64,
    pub book_anchor: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            graham: 0.25,
            earnings_power: 0.25,
            owner_earnings: 0.35,
            book_anchor: 0.15,
        }
    }
}

impl BlendWeights {
    pub fn weight(&self, model: ValuationModel) -> f64 {
        match model {
            ValuationModel::Graham => self.graham,
            ValuationModel::EarningsPower => self.earnings_power,
            ValuationModel::OwnerEarnings => self.owner_earnings,
            ValuationModel::BookAnchor => self.book_anchor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// Growth assumed when no price history is available
    pub default_growth: f64,
    pub min_growth: f64,
    pub max_growth: f64,
    /// Graham formula: `eps * (graham_base + graham_growth_multiplier * growth%)`
    pub graham_base: f64,
    pub graham_growth_multiplier: f64,
    pub base_pe: f64,
    pub pe_moat_coefficient: f64,
    pub pe_moat_min: f64,
    pub pe_moat_max: f64,
    pub pe_sentiment_coefficient: f64,
    pub pe_sentiment_limit: f64,
    pub min_pe: f64,
    pub max_pe: f64,
    /// Owner-earnings projection growth cap
    pub max_projection_growth: f64,
    pub discount_rate: f64,
    pub terminal_multiple: f64,
    pub projection_years: u32,
    pub base_pb: f64,
    pub pb_moat_coefficient: f64,
    pub min_pb: f64,
    pub max_pb: f64,
    pub weights: BlendWeights,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            default_growth: 0.05,
            min_growth: -0.01,
            max_growth: 0.18,
            graham_base: 8.5,
            graham_growth_multiplier: 2.0,
            base_pe: 11.0,
            pe_moat_coefficient: 8.0,
            pe_moat_min: -0.5,
            pe_moat_max: 1.0,
            pe_sentiment_coefficient: 3.0,
            pe_sentiment_limit: 0.25,
            min_pe: 8.0,
            max_pe: 28.0,
            max_projection_growth: 0.12,
            discount_rate: 0.10,
            terminal_multiple: 12.0,
            projection_years: 5,
            base_pb: 1.2,
            pb_moat_coefficient: 0.9,
            min_pb: 0.6,
            max_pb: 3.2,
            weights: BlendWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IntrinsicValueEstimator {
    config: ValuationConfig,
}

impl IntrinsicValueEstimator {
    pub fn new(config: ValuationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValuationConfig {
        &self.config
    }

    /// Growth rate fed to the models: history CAGR (or the default) clamped
    pub fn growth_rate(&self, history_growth: Option<f64>) -> f64 {
        let cfg = &self.config;
        clamp(history_growth.unwrap_or(cfg.default_growth), cfg.min_growth, cfg.max_growth)
    }

    pub fn graham(&self, eps: f64, growth: f64) -> f64 {
        eps * (self.config.graham_base + self.config.graham_growth_multiplier * growth * 100.0)
    }

    pub fn fair_pe(&self, moat: f64, sentiment: f64) -> f64 {
        let cfg = &self.config;
        let pe = cfg.base_pe
            + cfg.pe_moat_coefficient * clamp(moat, cfg.pe_moat_min, cfg.pe_moat_max)
            + cfg.pe_sentiment_coefficient
                * clamp(sentiment, -cfg.pe_sentiment_limit, cfg.pe_sentiment_limit);
        clamp(pe, cfg.min_pe, cfg.max_pe)
    }

    /// Discounted projection of EPS over the horizon plus a discounted terminal value
    pub fn owner_earnings(&self, eps: f64, growth: f64) -> f64 {
        let cfg = &self.config;
        let projection_growth = clamp(growth, 0.0, cfg.max_projection_growth);
        let mut earnings = eps;
        let mut present_value = 0.0;
        for year in 1..=cfg.projection_years {
            earnings *= 1.0 + projection_growth;
            present_value += earnings / (1.0 + cfg.discount_rate).powi(year as i32);
        }
        let terminal = earnings * cfg.terminal_multiple
            / (1.0 + cfg.discount_rate).powi(cfg.projection_years as i32);
        present_value + terminal
    }

    pub fn fair_pb(&self, moat: f64) -> f64 {
        let cfg = &self.config;
        clamp(cfg.base_pb + cfg.pb_moat_coefficient * moat, cfg.min_pb, cfg.max_pb)
    }

    /// Compute every model whose base metric is present and positive
    pub fn models(
        &self,
        metrics: &CanonicalMetrics,
        growth: f64,
        moat: f64,
        sentiment: f64,
    ) -> ValuationModels {
        let mut models = ValuationModels::new();

        if let Some(eps) = metrics.eps.filter(|e| *e > 0.0) {
            models.insert(ValuationModel::Graham, self.graham(eps, growth));
            models.insert(ValuationModel::EarningsPower, eps * self.fair_pe(moat, sentiment));
            models.insert(ValuationModel::OwnerEarnings, self.owner_earnings(eps, growth));
        }

        if let Some(bvps) = metrics.bvps.filter(|b| *b > 0.0) {
            models.insert(ValuationModel::BookAnchor, bvps * self.fair_pb(moat));
        }

        models
    }

    /// Weighted average over the present models, weights renormalized to sum to 1
    pub fn blend(&self, models: &ValuationModels) -> Option<f64> {
        let total_weight: f64 = models
            .keys()
            .map(|m| self.config.weights.weight(*m))
            .sum();
        if models.is_empty() || total_weight <= 0.0 {
            return None;
        }
        let weighted: f64 = models
            .iter()
            .map(|(m, value)| value * self.config.weights.weight(*m))
            .sum();
        Some(weighted / total_weight)
    }

    pub fn estimate(
        &self,
        price: f64,
        metrics: &CanonicalMetrics,
        history_growth: Option<f64>,
        moat: f64,
        sentiment: f64,
    ) -> ValuationResult {
        let growth_used = self.growth_rate(history_growth);
        let models = self.models(metrics, growth_used, moat, sentiment);

        let (intrinsic_value, margin_of_safety) = match self.blend(&models) {
            Some(intrinsic) if price > 0.0 => (Some(intrinsic), Some((intrinsic - price) / price)),
            _ => (None, None),
        };

        match intrinsic_value {
            Some(value) => tracing::debug!(
                "Blended {} valuation models into intrinsic value {:.2} (price {:.2})",
                models.len(),
                value,
                price
            ),
            None => tracing::debug!("No intrinsic value: {} models, price {:.2}", models.len(), price),
        }

        ValuationResult {
            intrinsic_value,
            margin_of_safety,
            models,
            growth_used,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn metrics(eps: Option<f64>, bvps: Option<f64>) -> CanonicalMetrics {
        CanonicalMetrics {
            eps,
            bvps,
            ..Default::default()
        }
    }

    #[test]
    fn test_growth_rate_default_and_clamp() {
        let estimator = IntrinsicValueEstimator::default();
        assert_relative_eq!(estimator.growth_rate(None), 0.05);
        assert_relative_eq!(estimator.growth_rate(Some(0.50)), 0.18);
        assert_relative_eq!(estimator.growth_rate(Some(-0.30)), -0.01);
        assert_relative_eq!(estimator.growth_rate(Some(0.08)), 0.08);
    }

    #[test]
    fn test_graham_and_earnings_power_scenario() {
        let estimator = IntrinsicValueEstimator::default();
        let models = estimator.models(&metrics(Some(5.0), None), 0.08, 0.0, 0.0);
        assert_relative_eq!(models[&ValuationModel::Graham], 122.5, epsilon = 1e-9);
        assert_relative_eq!(models[&ValuationModel::EarningsPower], 55.0, epsilon = 1e-9);
        assert!(models.contains_key(&ValuationModel::OwnerEarnings));
        assert!(!models.contains_key(&ValuationModel::BookAnchor));
    }

    #[test]
    fn test_book_anchor_scenario() {
        let estimator = IntrinsicValueEstimator::default();
        assert_relative_eq!(estimator.fair_pb(0.2), 1.38, epsilon = 1e-12);
        let models = estimator.models(&metrics(None, Some(30.0)), 0.05, 0.2, 0.0);
        assert_eq!(models.len(), 1);
        assert_relative_eq!(models[&ValuationModel::BookAnchor], 41.4, epsilon = 1e-9);
    }

    #[test]
    fn test_fair_pe_clamps() {
        let estimator = IntrinsicValueEstimator::default();
        // moat capped at 1.0 and sentiment at 0.25: 11 + 8 + 0.75
        assert_relative_eq!(estimator.fair_pe(5.0, 1.0), 19.75, epsilon = 1e-12);
        // moat floored at -0.5 and sentiment at -0.25: 11 - 4 - 0.75 = 6.25 -> 8
        assert_relative_eq!(estimator.fair_pe(-1.0, -1.0), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_fair_pb_clamps() {
        let estimator = IntrinsicValueEstimator::default();
        assert_relative_eq!(estimator.fair_pb(-1.0), 0.6, epsilon = 1e-12);
        assert_relative_eq!(estimator.fair_pb(1.0), 2.1, epsilon = 1e-12);
    }

    #[test]
    fn test_owner_earnings_projection() {
        let estimator = IntrinsicValueEstimator::default();
        // Zero growth: 5 years of 1.0 discounted at 10% plus 12x terminal
        let annuity: f64 = (1..=5).map(|y| 1.0 / 1.1_f64.powi(y)).sum();
        let expected = annuity + 12.0 / 1.1_f64.powi(5);
        assert_relative_eq!(estimator.owner_earnings(1.0, 0.0), expected, epsilon = 1e-12);
        // Negative growth is floored at zero for the projection
        assert_relative_eq!(estimator.owner_earnings(1.0, -0.01), expected, epsilon = 1e-12);

        // Growth is capped at 12% for the projection
        let capped = estimator.owner_earnings(2.0, 0.18);
        let mut earnings = 2.0;
        let mut pv = 0.0;
        for year in 1..=5 {
            earnings *= 1.12;
            pv += earnings / 1.1_f64.powi(year);
        }
        pv += earnings * 12.0 / 1.1_f64.powi(5);
        assert_relative_eq!(capped, pv, epsilon = 1e-9);
    }

    #[test]
    fn test_blend_renormalizes_over_present_models() {
        let estimator = IntrinsicValueEstimator::default();
        let mut models = ValuationModels::new();
        models.insert(ValuationModel::Graham, 100.0);
        models.insert(ValuationModel::BookAnchor, 20.0);
        // (100 * 0.25 + 20 * 0.15) / 0.40
        assert_relative_eq!(estimator.blend(&models).unwrap(), 70.0, epsilon = 1e-9);

        // A single model blends to itself
        let mut single = ValuationModels::new();
        single.insert(ValuationModel::OwnerEarnings, 42.0);
        assert_relative_eq!(estimator.blend(&single).unwrap(), 42.0, epsilon = 1e-12);

        // Equal values blend to that value for any subset
        let mut all = ValuationModels::new();
        for model in ValuationModel::ALL {
            all.insert(model, 10.0);
        }
        assert_relative_eq!(estimator.blend(&all).unwrap(), 10.0, epsilon = 1e-12);

        assert_eq!(estimator.blend(&ValuationModels::new()), None);
    }

    #[test]
    fn test_estimate_margin_of_safety() {
        let estimator = IntrinsicValueEstimator::default();
        let result = estimator.estimate(100.0, &metrics(None, Some(100.0)), None, 0.0, 0.0);
        // book anchor only: 100 * 1.2
        assert_relative_eq!(result.intrinsic_value.unwrap(), 120.0, epsilon = 1e-9);
        assert_relative_eq!(result.margin_of_safety.unwrap(), 0.2, epsilon = 1e-9);
        assert_relative_eq!(result.growth_used, 0.05);
    }

    #[test]
    fn test_estimate_without_usable_base_metrics() {
        let estimator = IntrinsicValueEstimator::default();
        for m in [metrics(None, None), metrics(Some(-2.0), Some(0.0)), metrics(Some(0.0), None)] {
            let result = estimator.estimate(50.0, &m, Some(0.1), 0.5, 0.1);
            assert_eq!(result.intrinsic_value, None);
            assert_eq!(result.margin_of_safety, None);
            assert!(result.models.is_empty());
        }
    }

    #[test]
    fn test_estimate_non_positive_price() {
        let estimator = IntrinsicValueEstimator::default();
        let result = estimator.estimate(0.0, &metrics(Some(3.0), Some(10.0)), None, 0.0, 0.0);
        assert_eq!(result.intrinsic_value, None);
        assert_eq!(result.margin_of_safety, None);
        assert_eq!(result.models.len(), 4);
    }
}
