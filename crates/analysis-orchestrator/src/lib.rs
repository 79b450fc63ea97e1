use analysis_core::{
    AnalysisError, CanonicalMetrics, FactorScores, HistoryStats, NewsItem, PriceSeries,
    Recommendation, SentimentResult, ValuationResult,
};
use fundamental_analysis::{extract_metrics, FactorScorer, FundamentalSnapshot, IntrinsicValueEstimator};
use quant_analysis::HistoryStatsCalculator;
use rayon::prelude::*;
use sentiment_analysis::SentimentAnalysisEngine;
use serde::{Deserialize, Serialize};

pub mod checklist;
pub mod config;
pub mod recommendation;
pub mod screener;

pub use checklist::{CheckStatus, Checklist, ChecklistItem, MANUAL_CHECKS};
pub use config::AnalysisConfig;
pub use recommendation::{
    RecommendationConfig, RecommendationEngine, RecommendationThresholds, RecommendationWeights,
};
pub use screener::{ScreenerFilters, ScreenerResult, ValuationScreener, ValuationSuggestion};


/// Already-fetched inputs for one ticker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerInputs {
    pub symbol: String,
    pub current_price: f64,
    /// Fundamental snapshot document; empty means no data
    #[serde(default)]
    pub snapshot: String,
    /// Monthly closes, oldest first
    #[serde(default)]
    pub prices: PriceSeries,
    #[serde(default)]
    pub news: Vec<NewsItem>,
    /// Requested number of news items to score
    #[serde(default)]
    pub news_items: Option<usize>,
}

/// Everything the engine derives for one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationReport {
    pub symbol: String,
    pub current_price: f64,
    pub metrics: CanonicalMetrics,
    pub history: HistoryStats,
    pub sentiment: SentimentResult,
    pub factors: FactorScores,
    pub valuation: ValuationResult,
    pub recommendation: Recommendation,
    /// Weighted total behind the recommendation; absent with INSUFFICIENT_DATA
    pub blended_score: Option<f64>,
    pub checklist: Checklist,
}

/// Runs the full scoring and valuation pipeline.
///
/// The pipeline holds only read-only configuration, so one instance can be
/// shared across threads and tickers.
pub struct ValuationPipeline {
    config: AnalysisConfig,
    history_calculator: HistoryStatsCalculator,
    sentiment_analyzer: SentimentAnalysisEngine,
    factor_scorer: FactorScorer,
    estimator: IntrinsicValueEstimator,
    recommender: RecommendationEngine,
}

impl ValuationPipeline {
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: AnalysisConfig) -> Self {
        Self {
            history_calculator: HistoryStatsCalculator::new(config.history),
            sentiment_analyzer: SentimentAnalysisEngine::with_config(config.sentiment),
            factor_scorer: FactorScorer::new(config.factors),
            estimator: IntrinsicValueEstimator::new(config.valuation),
            recommender: RecommendationEngine::new(config.recommendation),
            config,
        }
    }

    /// Replace the recommendation tables, keeping everything else
    pub fn with_recommendation(mut self, config: RecommendationConfig) -> Result<Self, AnalysisError> {
        self.config.recommendation = config;
        self.config.validate()?;
        self.recommender = RecommendationEngine::new(config);
        Ok(self)
    }

    /// Replace the valuation tables, keeping everything else
    pub fn with_valuation(
        mut self,
        config: fundamental_analysis::ValuationConfig,
    ) -> Result<Self, AnalysisError> {
        self.config.valuation = config;
        self.config.validate()?;
        self.estimator = IntrinsicValueEstimator::new(config);
        Ok(self)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn evaluate(&self, inputs: &TickerInputs) -> ValuationReport {
        let snapshot = FundamentalSnapshot::parse(&inputs.snapshot);
        let metrics = extract_metrics(&snapshot);
        let history = self.history_calculator.calculate(&inputs.prices);

        let news_items = self.config.sentiment.news_items(inputs.news_items);
        let sentiment = self.sentiment_analyzer.analyze(&inputs.news, news_items);

        let factors = self.factor_scorer.score(&metrics, &history, &sentiment);
        let valuation = self.estimator.estimate(
            inputs.current_price,
            &metrics,
            history.growth,
            factors.moat,
            sentiment.score,
        );
        let (recommendation, blended_score) =
            self.recommender
                .recommend(valuation.margin_of_safety, &factors, sentiment.score);
        let checklist = Checklist::evaluate(valuation.margin_of_safety, &factors);

        tracing::info!(
            "{}: {} (intrinsic {:?}, margin {:?}, {} news items scored)",
            inputs.symbol,
            recommendation.to_label(),
            valuation.intrinsic_value,
            valuation.margin_of_safety,
            sentiment.items_scored
        );

        ValuationReport {
            symbol: inputs.symbol.clone(),
            current_price: inputs.current_price,
            metrics,
            history,
            sentiment,
            factors,
            valuation,
            recommendation,
            blended_score,
            checklist,
        }
    }

    /// Evaluate independent tickers in parallel; output order matches input order
    pub fn evaluate_batch(&self, inputs: &[TickerInputs]) -> Vec<ValuationReport> {
        tracing::info!("Evaluating {} tickers", inputs.len());
        inputs.par_iter().map(|i| self.evaluate(i)).collect()
    }
}

impl Default for ValuationPipeline {
    fn default() -> Self {
        Self::build(AnalysisConfig::default())
    }
}
