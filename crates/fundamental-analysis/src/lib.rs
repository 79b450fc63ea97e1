//! Fundamental side of the valuation engine: snapshot parsing, metric
//! normalization, factor scoring and intrinsic value estimation.

pub mod factors;
pub mod metrics;
pub mod snapshot;
pub mod valuation;

pub use factors::{
    BandTerm, FactorConfig, FactorScorer, ManagementConfig, MoatConfig, PredictabilityConfig,
    QualityConfig, RiskConfig,
};
pub use metrics::{extract_metrics, normalize_percent};
pub use snapshot::{parse_number, FundamentalSnapshot};
pub use valuation::{BlendWeights, IntrinsicValueEstimator, ValuationConfig};
