use analysis_core::HistoryStats;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Minimum usable samples; below this every statistic is absent
    pub min_samples: usize,
    /// Samples per year (12 for monthly bars)
    pub periods_per_year: f64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            min_samples: 24,
            periods_per_year: 12.0,
        }
    }
}

/// Derives growth, drawdown, volatility and hit-rate statistics from a
/// monthly closing-price series.
#[derive(Debug, Clone, Default)]
pub struct HistoryStatsCalculator {
    config: HistoryConfig,
}

impl HistoryStatsCalculator {
    pub fn new(config: HistoryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Keep only strictly positive, finite prices
    fn usable_prices(&self, prices: &[Option<f64>]) -> Vec<f64> {
        prices
            .iter()
            .flatten()
            .copied()
            .filter(|p| p.is_finite() && *p > 0.0)
            .collect()
    }

    /// Compound annual growth rate; `n / periods_per_year` is the span in years
    fn calculate_cagr(&self, prices: &[f64]) -> f64 {
        let first = prices[0];
        let last = prices[prices.len() - 1];
        let years = prices.len() as f64 / self.config.periods_per_year;
        (last / first).powf(1.0 / years) - 1.0
    }

    /// Calculate maximum drawdown as a non-positive fraction
    fn calculate_max_drawdown(&self, prices: &[f64]) -> f64 {
        let mut peak = prices[0];
        let mut max_drawdown = 0.0_f64;
        for &price in prices {
            peak = peak.max(price);
            if peak > 0.0 {
                max_drawdown = max_drawdown.min((price - peak) / peak);
            }
        }
        max_drawdown
    }

    /// Calculate period-over-period returns
    fn calculate_returns(&self, prices: &[f64]) -> Vec<f64> {
        prices
            .windows(2)
            .filter(|w| w[0] > 0.0)
            .map(|w| w[1] / w[0] - 1.0)
            .collect()
    }

    pub fn calculate(&self, prices: &[Option<f64>]) -> HistoryStats {
        let prices = self.usable_prices(prices);
        if prices.len() < self.config.min_samples.max(2) {
            tracing::warn!(
                "Insufficient price history: {} usable samples, need {}",
                prices.len(),
                self.config.min_samples
            );
            return HistoryStats::default();
        }

        let growth = self.calculate_cagr(&prices);
        let max_drawdown = self.calculate_max_drawdown(&prices);
        let returns = self.calculate_returns(&prices);

        let (volatility, positive_month_ratio) = if returns.is_empty() {
            (0.0, None)
        } else {
            let positive = returns.iter().filter(|r| **r > 0.0).count();
            (
                returns.iter().population_std_dev(),
                Some(positive as f64 / returns.len() as f64),
            )
        };

        tracing::debug!(
            "History stats over {} samples: growth={:.4} drawdown={:.4} volatility={:.4}",
            prices.len(),
            growth,
            max_drawdown,
            volatility
        );

        HistoryStats {
            growth: Some(growth),
            max_drawdown: Some(max_drawdown),
            volatility: Some(volatility),
            positive_month_ratio,
        }
    }
}
