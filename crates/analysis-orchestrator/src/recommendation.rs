use analysis_core::{FactorScores, Recommendation};
use serde::{Deserialize, Serialize};

/// Input weights for the blended recommendation score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationWeights {
    pub margin_of_safety: f64,
    pub moat: f64,
    pub quality: f64,
    pub predictability: f64,
    pub management: f64,
    pub risk: f64,
    pub sentiment: f64,
}

impl Default for RecommendationWeights {
    fn default() -> Self {
        Self {
            margin_of_safety: 0.45,
            moat: 0.12,
            quality: 0.15,
            predictability: 0.12,
            management: 0.08,
            risk: 0.05,
            sentiment: 0.03,
        }
    }
}

/// Category cut-offs, checked top-down.
///
/// STRONG_BUY and BUY are inclusive (`>=`); HOLD and REDUCE are strict (`>`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationThresholds {
    pub strong_buy: f64,
    pub buy: f64,
    pub hold: f64,
    pub reduce: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            strong_buy: 0.28,
            buy: 0.12,
            hold: -0.04,
            reduce: -0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub weights: RecommendationWeights,
    pub thresholds: RecommendationThresholds,
}

/// Stateless mapping from margin of safety and factor scores to a category
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    config: RecommendationConfig,
}

impl RecommendationEngine {
    pub fn new(config: RecommendationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// Weighted total of the seven inputs
    pub fn blended_score(&self, margin_of_safety: f64, factors: &FactorScores, sentiment: f64) -> f64 {
        let w = &self.config.weights;
        margin_of_safety * w.margin_of_safety
            + factors.moat * w.moat
            + factors.quality * w.quality
            + factors.predictability * w.predictability
            + factors.management * w.management
            + factors.risk * w.risk
            + sentiment * w.sentiment
    }

    /// Map a blended total onto a category
    pub fn classify(&self, total: f64) -> Recommendation {
        let t = &self.config.thresholds;
        if total >= t.strong_buy {
            Recommendation::StrongBuy
        } else if total >= t.buy {
            Recommendation::Buy
        } else if total > t.hold {
            Recommendation::Hold
        } else if total > t.reduce {
            Recommendation::Reduce
        } else {
            Recommendation::Sell
        }
    }

    /// Recommendation plus the blended total it was derived from.
    ///
    /// Without a margin of safety there is no total and the answer is INSUFFICIENT_DATA.
    pub fn recommend(
        &self,
        margin_of_safety: Option<f64>,
        factors: &FactorScores,
        sentiment: f64,
    ) -> (Recommendation, Option<f64>) {
        match margin_of_safety {
            None => (Recommendation::InsufficientData, None),
            Some(margin) => {
                let total = self.blended_score(margin, factors, sentiment);
                (self.classify(total), Some(total))
            }
        }
    }
}
