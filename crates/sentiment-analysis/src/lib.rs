use analysis_core::scoring::clamp;
use analysis_core::{NewsItem, SentimentResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const POSITIVE_WORDS: &[&str] = &[
    "beat", "beats", "growth", "strong", "record", "upside", "surge", "profit",
    "profits", "improve", "improves", "improved", "expands", "expansion",
    "outperform", "outperformed", "bullish", "upgrade", "momentum", "resilient",
    "advantage", "leadership", "discipline", "cashflow", "buyback",
];

const NEGATIVE_WORDS: &[&str] = &[
    "miss", "misses", "weak", "drop", "plunge", "decline", "declines", "downside",
    "warning", "warns", "loss", "losses", "lawsuit", "downgrade", "bearish",
    "investigation", "cut", "cuts", "slump", "recession", "fraud", "restatement",
    "bankruptcy", "dilution", "liquidity",
];

/// Narrative risk words, counted independently of polarity
const RED_FLAG_WORDS: &[&str] = &[
    "fraud", "investigation", "restatement", "bankruptcy", "default",
    "insolvency", "probe", "subpoena", "whistleblower", "accounting",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Article bodies are truncated to this many characters before scoring
    pub max_body_chars: usize,
    pub default_news_items: usize,
    pub min_news_items: usize,
    pub max_news_items: usize,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            max_body_chars: 1200,
            default_news_items: 18,
            min_news_items: 5,
            max_news_items: 40,
        }
    }
}

impl SentimentConfig {
    /// Resolve the number of news items to score, clamped to the allowed range
    pub fn news_items(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_news_items)
            .max(self.min_news_items)
            .min(self.max_news_items)
    }
}

/// Lower-case the text and extract maximal runs of ASCII letters and apostrophes
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_ascii_alphabetic() || c == '\''))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Per-item lexicon hit counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexiconHits {
    pub positive: usize,
    pub negative: usize,
    pub red_flags: usize,
}

impl LexiconHits {
    /// Polarity in [-1, 1], or `None` when the item has no polarity hits
    pub fn polarity(&self) -> Option<f64> {
        let total = self.positive + self.negative;
        if total == 0 {
            return None;
        }
        Some((self.positive as f64 - self.negative as f64) / total as f64)
    }
}

pub struct SentimentAnalysisEngine {
    positive_words: HashSet<&'static str>,
    negative_words: HashSet<&'static str>,
    red_flag_words: HashSet<&'static str>,
    config: SentimentConfig,
}

impl SentimentAnalysisEngine {
    pub fn new() -> Self {
        Self::with_config(SentimentConfig::default())
    }

    pub fn with_config(config: SentimentConfig) -> Self {
        Self {
            positive_words: POSITIVE_WORDS.iter().copied().collect(),
            negative_words: NEGATIVE_WORDS.iter().copied().collect(),
            red_flag_words: RED_FLAG_WORDS.iter().copied().collect(),
            config,
        }
    }

    pub fn config(&self) -> &SentimentConfig {
        &self.config
    }

    fn count_hits(&self, words: &[String], hits: &mut LexiconHits) {
        for word in words {
            let word = word.as_str();
            if self.positive_words.contains(word) {
                hits.positive += 1;
            }
            if self.negative_words.contains(word) {
                hits.negative += 1;
            }
            if self.red_flag_words.contains(word) {
                hits.red_flags += 1;
            }
        }
    }

    /// Count lexicon hits in a headline plus its (truncated) body
    pub fn analyze_item(&self, item: &NewsItem) -> LexiconHits {
        let mut hits = LexiconHits::default();
        self.count_hits(&tokenize(&item.headline), &mut hits);
        if let Some(body) = item.body.as_deref() {
            let cutoff = body
                .char_indices()
                .nth(self.config.max_body_chars)
                .map_or(body.len(), |(i, _)| i);
            self.count_hits(&tokenize(&body[..cutoff]), &mut hits);
        }
        hits
    }

    /// Score the first `limit` items of the corpus.
    ///
    /// Items without polarity hits are left out of the average but still count
    /// towards red flags. With nothing scored the score is 0.0.
    pub fn analyze(&self, news: &[NewsItem], limit: usize) -> SentimentResult {
        let mut accumulator = 0.0;
        let mut items_scored = 0;
        let mut red_flag_hits = 0;

        for item in news.iter().take(limit) {
            let hits = self.analyze_item(item);
            if let Some(polarity) = hits.polarity() {
                accumulator += polarity;
                items_scored += 1;
            }
            red_flag_hits += hits.red_flags;
        }

        let score = if items_scored > 0 {
            clamp(accumulator / items_scored as f64, -1.0, 1.0)
        } else {
            0.0
        };

        tracing::debug!(
            "Sentiment {:.3} from {} of {} items, {} red-flag hits",
            score,
            items_scored,
            news.len().min(limit),
            red_flag_hits
        );

        SentimentResult {
            score,
            items_scored,
            red_flag_hits,
        }
    }
}

impl Default for SentimentAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(headline: &str) -> NewsItem {
        NewsItem::new(headline, None)
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Apple BEATS estimates; CEO's outlook: 12% growth!"),
            vec!["apple", "beats", "estimates", "ceo's", "outlook", "growth"]
        );
        assert!(tokenize("  123 -- 4.5 ").is_empty());
    }

    #[test]
    fn test_empty_corpus() {
        let engine = SentimentAnalysisEngine::new();
        assert_eq!(engine.analyze(&[], 18), SentimentResult::default());
    }

    #[test]
    fn test_item_polarity_average() {
        let engine = SentimentAnalysisEngine::new();
        let news = vec![
            item("Record profit and strong growth"),  // +1
            item("Weak quarter as sales decline"),    // -1
            item("Upgrade despite lawsuit and a loss"), // (1 - 2) / 3
        ];
        let result = engine.analyze(&news, 18);
        assert_eq!(result.items_scored, 3);
        let expected = (1.0 - 1.0 - 1.0 / 3.0) / 3.0;
        assert!((result.score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unscored_items_still_count_red_flags() {
        let engine = SentimentAnalysisEngine::new();
        let news = vec![
            item("Company receives subpoena over accounting"),
            item("Board meeting scheduled"),
        ];
        let result = engine.analyze(&news, 18);
        assert_eq!(result.items_scored, 0);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.red_flag_hits, 2);
    }

    #[test]
    fn test_red_flags_overlap_with_negative_lexicon() {
        let engine = SentimentAnalysisEngine::new();
        let hits = engine.analyze_item(&item("Fraud investigation widens"));
        assert_eq!(hits.negative, 2);
        assert_eq!(hits.red_flags, 2);
        assert_eq!(hits.polarity(), Some(-1.0));
    }

    #[test]
    fn test_body_is_truncated() {
        let engine = SentimentAnalysisEngine::with_config(SentimentConfig {
            max_body_chars: 20,
            ..Default::default()
        });
        // "strong" sits inside the first 20 chars, "fraud" beyond them
        let body = format!("{}strong {} fraud", "x ".repeat(5), "y ".repeat(20));
        let hits = engine.analyze_item(&NewsItem::new("Update", Some(body)));
        assert_eq!(hits.positive, 1);
        assert_eq!(hits.negative, 0);
        assert_eq!(hits.red_flags, 0);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let engine = SentimentAnalysisEngine::with_config(SentimentConfig {
            max_body_chars: 3,
            ..Default::default()
        });
        let hits = engine.analyze_item(&NewsItem::new("", Some("ééé strong".to_string())));
        assert_eq!(hits, LexiconHits::default());
    }

    #[test]
    fn test_limit_caps_processed_items() {
        let engine = SentimentAnalysisEngine::new();
        let news = vec![
            item("strong growth"),
            item("weak decline"),
            item("bankruptcy filing"),
        ];
        let result = engine.analyze(&news, 1);
        assert_eq!(result.items_scored, 1);
        assert_eq!(result.score, 1.0);
        assert_eq!(result.red_flag_hits, 0);
    }

    #[test]
    fn test_score_bounded() {
        let engine = SentimentAnalysisEngine::new();
        let headlines = ["beat beat beat", "miss miss", "growth cut", "profit fraud default"];
        let news: Vec<NewsItem> = headlines.iter().map(|h| item(h)).collect();
        for limit in 0..=news.len() {
            let result = engine.analyze(&news, limit);
            assert!((-1.0..=1.0).contains(&result.score));
        }
    }

    #[test]
    fn test_news_items_clamp() {
        let config = SentimentConfig::default();
        assert_eq!(config.news_items(None), 18);
        assert_eq!(config.news_items(Some(2)), 5);
        assert_eq!(config.news_items(Some(100)), 40);
        assert_eq!(config.news_items(Some(25)), 25);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: SentimentConfig = serde_json::from_str(r#"{"max_body_chars": 600}"#).unwrap();
        assert_eq!(config.max_body_chars, 600);
        assert_eq!(config.default_news_items, 18);
    }
}
