//! valuation-cli: score already-fetched ticker bundles and print a dashboard.
//!
//! Each input file holds one ticker bundle or a JSON array of them:
//! `{ "symbol", "current_price", "snapshot", "prices", "news", "news_items" }`.
//!
//! Usage:
//!   cargo run -p valuation-cli -- data/acme.json
//!   cargo run -p valuation-cli -- data/*.json --rank --news-items 25
//!   cargo run -p valuation-cli -- data/acme.json --config tuning.json --json

mod dashboard;

use analysis_orchestrator::{
    AnalysisConfig, ScreenerFilters, ScreenerResult, TickerInputs, ValuationPipeline,
    ValuationReport, ValuationScreener,
};
use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "valuation-cli",
    version,
    about = "Value-investing scorecard for pre-fetched ticker data"
)]
struct Args {
    /// Ticker bundle files (one object or an array per file)
    #[arg(required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// JSON file overriding engine constants
    #[arg(long, env = "VALUATION_CONFIG")]
    config: Option<PathBuf>,

    /// News items to score per ticker (clamped to the configured range)
    #[arg(long, env = "VALUATION_NEWS_ITEMS")]
    news_items: Option<usize>,

    /// Print the reports as JSON instead of the dashboard
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Rank tickers by blended score after the individual reports
    #[arg(long, default_value_t = false)]
    rank: bool,

    /// Only rank tickers whose margin of safety reaches this fraction
    #[arg(long)]
    min_margin: Option<f64>,

    /// Emit logs as JSON lines
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InputFile {
    Many(Vec<TickerInputs>),
    One(TickerInputs),
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    generated_at: DateTime<Utc>,
    reports: &'a [ValuationReport],
    #[serde(skip_serializing_if = "Option::is_none")]
    ranking: Option<ScreenerResult>,
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "valuation_cli=info,analysis_orchestrator=info".into());
    // Logs go to stderr so stdout stays clean for the dashboard or JSON
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AnalysisConfig> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = AnalysisConfig::from_json_str(&raw)
        .with_context(|| format!("invalid config {}", path.display()))?;
    tracing::info!("Loaded config overrides from {}", path.display());
    Ok(config)
}

fn load_inputs(paths: &[PathBuf], news_items: Option<usize>) -> anyhow::Result<Vec<TickerInputs>> {
    let mut inputs = Vec::new();
    for path in paths {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let parsed: InputFile = serde_json::from_str(&raw)
            .with_context(|| format!("parsing ticker bundle {}", path.display()))?;
        match parsed {
            InputFile::Many(many) => inputs.extend(many),
            InputFile::One(one) => inputs.push(one),
        }
    }

    // The command-line request wins over whatever the bundle carries
    if news_items.is_some() {
        for input in &mut inputs {
            input.news_items = news_items;
        }
    }
    Ok(inputs)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging(args.json_logs);

    let config = load_config(args.config.as_deref())?;
    let pipeline = ValuationPipeline::new(config)?;

    let inputs = load_inputs(&args.inputs, args.news_items)?;
    if inputs.is_empty() {
        anyhow::bail!("no ticker bundles found in {} file(s)", args.inputs.len());
    }
    tracing::info!("valuation-cli: {} tickers from {} file(s)", inputs.len(), args.inputs.len());

    let reports = pipeline.evaluate_batch(&inputs);

    let ranking = args.rank.then(|| {
        ValuationScreener::new(ScreenerFilters {
            min_margin_of_safety: args.min_margin,
            limit: reports.len(),
            ..Default::default()
        })
        .screen(&reports)
    });

    if args.json {
        let output = JsonOutput {
            generated_at: Utc::now(),
            reports: &reports,
            ranking,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for report in &reports {
        println!("{}", dashboard::render(report));
    }
    if let Some(ranking) = &ranking {
        println!("{}", dashboard::render_ranking(ranking));
    }
    Ok(())
}
