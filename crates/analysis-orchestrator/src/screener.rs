use super::{CheckStatus, ValuationReport};
use analysis_core::Recommendation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationSuggestion {
    pub symbol: String,
    pub recommendation: Recommendation,
    pub blended_score: f64,
    pub margin_of_safety: f64,
    pub key_highlights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerResult {
    pub suggestions: Vec<ValuationSuggestion>,
    pub total_analyzed: usize,
    pub total_passed_filters: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerFilters {
    pub min_blended_score: Option<f64>,
    pub min_margin_of_safety: Option<f64>,
    pub limit: usize,
}

impl Default for ScreenerFilters {
    fn default() -> Self {
        Self {
            min_blended_score: None,
            min_margin_of_safety: None,
            limit: 10,
        }
    }
}

/// Ranks finished reports by blended score, highest first.
///
/// Reports without a margin of safety (INSUFFICIENT_DATA) are never suggested.
#[derive(Debug, Clone, Default)]
pub struct ValuationScreener {
    filters: ScreenerFilters,
}

impl ValuationScreener {
    pub fn new(filters: ScreenerFilters) -> Self {
        Self { filters }
    }

    pub fn screen(&self, reports: &[ValuationReport]) -> ScreenerResult {
        let total_analyzed = reports.len();

        let mut suggestions: Vec<ValuationSuggestion> = reports
            .iter()
            .filter_map(|report| self.create_suggestion(report))
            .filter(|s| {
                self.filters
                    .min_blended_score
                    .map_or(true, |min| s.blended_score >= min)
                    && self
                        .filters
                        .min_margin_of_safety
                        .map_or(true, |min| s.margin_of_safety >= min)
            })
            .collect();

        let total_passed_filters = suggestions.len();

        // Sort by score (highest first); ties keep input order
        suggestions.sort_by(|a, b| {
            b.blended_score
                .partial_cmp(&a.blended_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        suggestions.truncate(self.filters.limit);

        tracing::info!(
            "Screen complete: {}/{} tickers passed filters, returning top {}",
            total_passed_filters,
            total_analyzed,
            suggestions.len()
        );

        ScreenerResult {
            suggestions,
            total_analyzed,
            total_passed_filters,
        }
    }

    fn create_suggestion(&self, report: &ValuationReport) -> Option<ValuationSuggestion> {
        let blended_score = report.blended_score?;
        let margin_of_safety = report.valuation.margin_of_safety?;

        let mut highlights: Vec<String> = report
            .checklist
            .items
            .iter()
            .filter(|item| item.status == CheckStatus::Pass)
            .map(|item| item.label.clone())
            .collect();

        if report.sentiment.red_flag_hits > 0 {
            highlights.push(format!("{} narrative red flags", report.sentiment.red_flag_hits));
        }

        Some(ValuationSuggestion {
            symbol: report.symbol.clone(),
            recommendation: report.recommendation,
            blended_score,
            margin_of_safety,
            key_highlights: highlights,
        })
    }
}
