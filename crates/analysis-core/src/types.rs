use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical fundamental metrics extracted from a snapshot.
///
/// Percent-typed fields (`roe`, `roic`, margins, `dividend_yield`) are stored
/// as fractions (0.15, not 15).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMetrics {
    pub eps: Option<f64>,
    pub bvps: Option<f64>,
    pub pe: Option<f64>,
    pub pb: Option<f64>,
    pub roe: Option<f64>,
    pub roic: Option<f64>,
    pub gross_margin: Option<f64>,
    pub oper_margin: Option<f64>,
    pub net_margin: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub interest_cover: Option<f64>,
    pub dividend_yield: Option<f64>,
}

impl CanonicalMetrics {
    /// Number of fields that resolved to a value
    pub fn present_count(&self) -> usize {
        [
            self.eps,
            self.bvps,
            self.pe,
            self.pb,
            self.roe,
            self.roic,
            self.gross_margin,
            self.oper_margin,
            self.net_margin,
            self.debt_to_equity,
            self.current_ratio,
            self.interest_cover,
            self.dividend_yield,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }
}

/// Monthly closing prices, oldest first. Missing or placeholder entries are `None`.
pub type PriceSeries = Vec<Option<f64>>;

/// Statistics derived from a monthly price series.
///
/// All four fields are derived from the same filtered series, so they are
/// either all present or all absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Compound annual growth rate
    pub growth: Option<f64>,
    /// Largest peak-to-trough decline, as a non-positive fraction
    pub max_drawdown: Option<f64>,
    /// Population standard deviation of monthly returns
    pub volatility: Option<f64>,
    /// Fraction of monthly returns strictly above zero
    pub positive_month_ratio: Option<f64>,
}

impl HistoryStats {
    pub fn is_available(&self) -> bool {
        self.growth.is_some()
    }
}

/// News item as handed over by the data-acquisition layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub headline: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl NewsItem {
    pub fn new(headline: impl Into<String>, body: Option<String>) -> Self {
        Self {
            headline: headline.into(),
            body,
        }
    }
}

/// Lexicon sentiment over a news corpus
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Mean polarity of the scored items (-1 to 1)
    pub score: f64,
    /// Items that contained at least one lexicon hit
    pub items_scored: usize,
    /// Red-flag word hits across every processed item
    pub red_flag_hits: usize,
}

/// Five bounded factor scores, each in [-1, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    pub moat: f64,
    pub quality: f64,
    pub predictability: f64,
    pub management: f64,
    pub risk: f64,
}

/// Per-share valuation models blended into the intrinsic value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationModel {
    Graham,
    EarningsPower,
    OwnerEarnings,
    BookAnchor,
}

impl ValuationModel {
    pub const ALL: [ValuationModel; 4] = [
        ValuationModel::Graham,
        ValuationModel::EarningsPower,
        ValuationModel::OwnerEarnings,
        ValuationModel::BookAnchor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValuationModel::Graham => "graham",
            ValuationModel::EarningsPower => "earnings_power",
            ValuationModel::OwnerEarnings => "owner_earnings",
            ValuationModel::BookAnchor => "book_anchor",
        }
    }
}

/// Model name to per-share value; zero to four entries
pub type ValuationModels = BTreeMap<ValuationModel, f64>;

/// Blended intrinsic value estimate.
///
/// `intrinsic_value` and `margin_of_safety` are jointly present or absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub intrinsic_value: Option<f64>,
    pub margin_of_safety: Option<f64>,
    pub models: ValuationModels,
    /// Clamped growth rate fed to the models
    pub growth_used: f64,
}

/// Final categorical recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Hold,
    Reduce,
    Sell,
    InsufficientData,
}

impl Recommendation {
    /// Human-readable label for the recommendation
    pub fn to_label(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "STRONG BUY",
            Recommendation::Buy => "BUY",
            Recommendation::Hold => "HOLD",
            Recommendation::Reduce => "REDUCE",
            Recommendation::Sell => "SELL",
            Recommendation::InsufficientData => "INSUFFICIENT DATA",
        }
    }

    /// One-line investment thesis matching the recommendation
    pub fn thesis(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy | Recommendation::Buy => {
                "valuation + quality + moat exceed risk constraints"
            }
            Recommendation::Hold => "mixed signal set; price near fair value or uncertain quality",
            Recommendation::Reduce | Recommendation::Sell => {
                "weak margin of safety or quality/risk profile not compelling"
            }
            Recommendation::InsufficientData => {
                "no usable earnings or book value; intrinsic value cannot be estimated"
            }
        }
    }
}
