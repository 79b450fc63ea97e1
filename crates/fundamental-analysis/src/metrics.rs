use crate::snapshot::FundamentalSnapshot;
use analysis_core::CanonicalMetrics;

// Alias lists are in priority order; the first present alias wins.
const EPS: &[&str] = &["EPS", "EPS_TTM", "TTMEPSXCLX", "DilutedEPSExclExtraTTM"];
const BVPS: &[&str] = &["BookValuePerShare", "BVPS", "QBVPS"];
const PE: &[&str] = &["PERatio", "PE", "TTMPR2EPS", "PEEXCLXOR"];
const PB: &[&str] = &["Price2Book", "PriceToBook", "PB", "PRICE2BK"];
const ROE: &[&str] = &["ROE", "ReturnOnEquity", "TTMROEPCT"];
const ROIC: &[&str] = &["ROIC", "ReturnOnInvestedCapital", "TTMROIPCT"];
const GROSS_MARGIN: &[&str] = &["GrossMargin", "TTMGROSMGN"];
const OPER_MARGIN: &[&str] = &["OperatingMargin", "TTMOPMGN"];
const NET_MARGIN: &[&str] = &["NetProfitMargin", "TTMNPMGN"];
const DEBT_TO_EQUITY: &[&str] = &["DebtToEquity", "TotalDebtToEquity", "LTDebt2Equity"];
const CURRENT_RATIO: &[&str] = &["CurrentRatio", "QCURRATIO"];
const INTEREST_COVER: &[&str] = &["InterestCoverage", "TTMINTCOV"];
const DIVIDEND_YIELD: &[&str] = &["DividendYield", "DivYield", "YIELD"];

/// Normalize a percent-bearing value to a fraction.
///
/// Magnitudes above 1 are taken to be whole percent and divided by 100. A true
/// fraction above 1 (150% stored as 1.5) cannot be told apart from 1.5% and
/// comes out as 0.015.
pub fn normalize_percent(value: Option<f64>) -> Option<f64> {
    value.map(|v| if v.abs() > 1.0 { v / 100.0 } else { v })
}

/// Map a parsed snapshot onto the canonical metric set
pub fn extract_metrics(snapshot: &FundamentalSnapshot) -> CanonicalMetrics {
    let metrics = CanonicalMetrics {
        eps: snapshot.get_any(EPS),
        bvps: snapshot.get_any(BVPS),
        pe: snapshot.get_any(PE),
        pb: snapshot.get_any(PB),
        roe: normalize_percent(snapshot.get_any(ROE)),
        roic: normalize_percent(snapshot.get_any(ROIC)),
        gross_margin: normalize_percent(snapshot.get_any(GROSS_MARGIN)),
        oper_margin: normalize_percent(snapshot.get_any(OPER_MARGIN)),
        net_margin: normalize_percent(snapshot.get_any(NET_MARGIN)),
        debt_to_equity: snapshot.get_any(DEBT_TO_EQUITY),
        current_ratio: snapshot.get_any(CURRENT_RATIO),
        interest_cover: snapshot.get_any(INTEREST_COVER),
        dividend_yield: normalize_percent(snapshot.get_any(DIVIDEND_YIELD)),
    };
    tracing::debug!(
        "Resolved {} of 13 canonical metrics from {} snapshot fields",
        metrics.present_count(),
        snapshot.len()
    );
    metrics
}
