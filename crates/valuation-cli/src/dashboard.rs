//! Plain-text dashboard for a finished valuation report.

use analysis_core::ValuationModel;
use analysis_orchestrator::{ScreenerResult, ValuationReport, MANUAL_CHECKS};
use std::fmt::Write;

const RULE_WIDTH: usize = 64;
const DISCLAIMER: &str =
    "Educational tool only. Not investment advice; verify filings before acting.";

fn rule(c: char) -> String {
    std::iter::repeat(c).take(RULE_WIDTH).collect()
}

/// Format an optional number, "n/a" when absent
pub fn fmt_num(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "n/a".to_string(),
    }
}

/// Format an optional fraction as a percentage (0.123 -> "12.3%")
pub fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => "n/a".to_string(),
    }
}

/// Signed score with a fixed-width bar, e.g. "+0.40 [++++      ]"
pub fn score_bar(score: f64) -> String {
    let ticks = (score.abs().min(1.0) * 10.0).round() as usize;
    let mark = if score >= 0.0 { '+' } else { '-' };
    let bar: String = std::iter::repeat(mark)
        .take(ticks)
        .chain(std::iter::repeat(' ').take(10 - ticks))
        .collect();
    format!("{:+.2} [{}]", score, bar)
}

pub fn render(report: &ValuationReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &ValuationReport) -> std::fmt::Result {
    let m = &report.metrics;
    let h = &report.history;

    writeln!(out, "{}", rule('='))?;
    writeln!(out, " {}  @ {:.2}", report.symbol, report.current_price)?;
    writeln!(out, "{}", rule('='))?;

    writeln!(out, "Fundamentals ({}/13 fields)", m.present_count())?;
    writeln!(
        out,
        "  EPS {:>10}   BVPS {:>10}   P/E {:>8}   P/B {:>8}",
        fmt_num(m.eps, 2),
        fmt_num(m.bvps, 2),
        fmt_num(m.pe, 1),
        fmt_num(m.pb, 2)
    )?;
    writeln!(
        out,
        "  ROE {:>10}   ROIC {:>10}   Gross {:>6}   Oper {:>7}   Net {:>7}",
        fmt_pct(m.roe),
        fmt_pct(m.roic),
        fmt_pct(m.gross_margin),
        fmt_pct(m.oper_margin),
        fmt_pct(m.net_margin)
    )?;
    writeln!(
        out,
        "  D/E {:>10}   Current {:>7}   Int. cover {:>6}   Yield {:>7}",
        fmt_num(m.debt_to_equity, 2),
        fmt_num(m.current_ratio, 2),
        fmt_num(m.interest_cover, 1),
        fmt_pct(m.dividend_yield)
    )?;

    writeln!(out, "Price history")?;
    if h.is_available() {
        writeln!(
            out,
            "  CAGR {}   Max drawdown {}   Volatility {}   Up months {}",
            fmt_pct(h.growth),
            fmt_pct(h.max_drawdown),
            fmt_pct(h.volatility),
            fmt_pct(h.positive_month_ratio)
        )?;
    } else {
        writeln!(out, "  not enough monthly closes")?;
    }

    writeln!(out, "Value models (growth used {})", fmt_pct(Some(report.valuation.growth_used)))?;
    for model in ValuationModel::ALL {
        writeln!(
            out,
            "  {:<16} {:>10}",
            model.as_str(),
            fmt_num(report.valuation.models.get(&model).copied(), 2)
        )?;
    }
    writeln!(
        out,
        "  {:<16} {:>10}   margin of safety {}",
        "intrinsic",
        fmt_num(report.valuation.intrinsic_value, 2),
        fmt_pct(report.valuation.margin_of_safety)
    )?;

    let f = &report.factors;
    writeln!(out, "Scorecard")?;
    for (name, score) in [
        ("moat", f.moat),
        ("quality", f.quality),
        ("predictability", f.predictability),
        ("management", f.management),
        ("risk", f.risk),
    ] {
        writeln!(out, "  {:<16} {}", name, score_bar(score))?;
    }

    writeln!(out, "Checklist ({}/{} pass)", report.checklist.passed(), report.checklist.items.len())?;
    for item in &report.checklist.items {
        writeln!(out, "  [{}] {}", item.status.as_str(), item.label)?;
    }
    for (label, status) in MANUAL_CHECKS {
        writeln!(out, "  [{}] {}", status, label)?;
    }

    let s = &report.sentiment;
    writeln!(out, "Narrative")?;
    writeln!(
        out,
        "  sentiment {}   items scored {}   red flags {}",
        score_bar(s.score),
        s.items_scored,
        s.red_flag_hits
    )?;

    writeln!(out, "{}", rule('-'))?;
    writeln!(
        out,
        "Decision: {}  (score {})",
        report.recommendation.to_label(),
        fmt_num(report.blended_score, 3)
    )?;
    writeln!(out, "Thesis: {}", report.recommendation.thesis())?;
    writeln!(out, "{}", DISCLAIMER)?;
    Ok(())
}

/// One line per ranked ticker, best first
pub fn render_ranking(result: &ScreenerResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Ranking: {} of {} tickers passed filters",
        result.total_passed_filters, result.total_analyzed
    );
    for (rank, s) in result.suggestions.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<8} {:<18} score {:+.3}  margin {:>7}  {}",
            rank + 1,
            s.symbol,
            s.recommendation.to_label(),
            s.blended_score,
            fmt_pct(Some(s.margin_of_safety)),
            s.key_highlights.join("; ")
        );
    }
    out
}
