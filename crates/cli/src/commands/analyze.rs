//! Analyze CLI command.
//!
//! Reads a token dataset and an optional reference price chart, runs the
//! full analysis pipeline and reports the Bull vs Bear findings.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Args;
use launch_cycle_analysis::{AnalysisPipeline, AnalysisReport, ReferenceSeries, SweepParameter, TestResult};
use launch_cycle_core::{ConfigLoader, TokenRecord};
use serde::Deserialize;

/// Output format for the analysis report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Parses an output format from string.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!(
                "Unknown format: '{}'. Valid formats: text, json",
                s
            )),
        }
    }
}

/// Arguments for the analyze command.
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Token dataset (JSON array of token records)
    #[arg(short, long)]
    pub tokens: PathBuf,

    /// Reference asset price chart: {"prices": [[ts_ms, price], ...]} or a bare array
    #[arg(short, long)]
    pub reference: Option<PathBuf>,

    /// Analysis config file (TOML); defaults apply if it does not exist
    #[arg(short, long, default_value = "config/Analysis.toml")]
    pub config: String,

    /// Date ages are measured to, YYYY-MM-DD (default: today, UTC)
    #[arg(long)]
    pub as_of: Option<String>,

    /// Write the JSON report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the enriched, filtered token records to this file
    #[arg(long)]
    pub tokens_output: Option<PathBuf>,

    /// Console output format: text or json
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Reference chart as returned by market-chart endpoints, or just the pairs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReferenceFile {
    Chart { prices: Vec<(f64, f64)> },
    Pairs(Vec<(f64, f64)>),
}

/// Parses a reference chart document into a daily series.
pub fn parse_reference(json: &str) -> Result<ReferenceSeries> {
    let file: ReferenceFile =
        serde_json::from_str(json).context("reference chart is not a list of [timestamp_ms, price] pairs")?;
    let pairs = match file {
        ReferenceFile::Chart { prices } => prices,
        ReferenceFile::Pairs(pairs) => pairs,
    };
    Ok(ReferenceSeries::from_millis(&pairs))
}

/// Parses the `--as-of` argument, defaulting to today.
fn parse_as_of(value: Option<&str>) -> Result<NaiveDate> {
    match value {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| anyhow!("Invalid as-of date '{}'. Use YYYY-MM-DD", s)),
        None => Ok(Utc::now().date_naive()),
    }
}

fn fmt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:+.1}%", v * 100.0))
}

fn fmt_p(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |p| format!("{p:.4}"))
}

fn format_test(label: &str, test: &TestResult) -> String {
    let mut output = format!("{label}\n");
    output.push_str("---------------------------------------------------------------\n");
    output.push_str(&format!("Bull n / Bear n: {} / {}\n", test.n1, test.n2));
    if test.is_insufficient() {
        output.push_str("Result:          INSUFFICIENT DATA\n\n");
        return output;
    }
    output.push_str(&format!("Mann-Whitney p:  {}\n", fmt_p(test.p_value)));
    output.push_str(&format!(
        "Effect size (r): {}\n",
        test.effect_size.map_or_else(|| "n/a".to_string(), |r| format!("{r:+.3}"))
    ));
    output.push_str(&format!("Median diff:     {}\n", fmt_pct(test.median_diff)));
    output.push_str(&format!(
        "95% CI:          [{}, {}]\n",
        fmt_pct(test.ci_lower),
        fmt_pct(test.ci_upper)
    ));
    let sig_label = if test.significant {
        "SIGNIFICANT"
    } else {
        "NOT SIGNIFICANT"
    };
    output.push_str(&format!("Result:          {sig_label}\n\n"));
    output
}

/// Renders the human-readable summary of a report.
pub fn format_text_report(report: &AnalysisReport) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("===============================================================\n");
    output.push_str("                  LAUNCH CYCLE ANALYSIS RESULTS                \n");
    output.push_str("===============================================================\n");
    output.push_str(&format!("As of: {}\n", report.as_of));
    output.push_str(&format!(
        "Tokens analysed: {} ({} with launch date)\n",
        report.total_tokens, report.tokens_with_launch_date
    ));
    output.push_str(&format!(
        "Excluded: {} stablecoins, {} wrapped; imputed dead: {}\n\n",
        report.transparency.excluded_stablecoin,
        report.transparency.excluded_wrapped,
        report.transparency.imputed_dead
    ));

    output.push_str("BY CYCLE TYPE\n");
    output.push_str("---------------------------------------------------------------\n");
    output.push_str("Type      Count  Med ROI    Med CAGR   Med vs Ref  Delist\n");
    for (cycle_type, group) in &report.groups {
        output.push_str(&format!(
            "{:<9} {:>5}  {:>9}  {:>9}  {:>10}  {:>6}\n",
            cycle_type.as_str(),
            group.count,
            fmt_pct(group.median_roi),
            fmt_pct(group.median_annualized_roi),
            fmt_pct(group.median_roi_vs_reference),
            fmt_pct(group.delist_rate),
        ));
    }
    output.push('\n');

    output.push_str(&format_test("BULL VS BEAR: ANNUALIZED ROI", &report.primary_test));
    output.push_str(&format_test(
        "BULL VS BEAR: ROI VS REFERENCE",
        &report.reference_relative_test,
    ));

    let sweeps = report
        .boundary_sensitivity
        .iter()
        .chain(&report.moving_average_robustness);
    output.push_str("ROBUSTNESS\n");
    output.push_str("---------------------------------------------------------------\n");
    for result in sweeps {
        let label = match result.parameter {
            SweepParameter::ShiftMonths(m) => format!("shift {m:+} months"),
            SweepParameter::WindowDays(w) => format!("SMA {w} days"),
        };
        output.push_str(&format!(
            "{:<18} p = {:<8} n = {}/{}{}\n",
            label,
            fmt_p(result.test.p_value),
            result.test.n1,
            result.test.n2,
            if result.test.significant { "  *" } else { "" }
        ));
    }
    output.push_str("===============================================================\n");

    output
}

pub async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;
    let as_of = parse_as_of(args.as_of.as_deref())?;

    let config = ConfigLoader::load_from(&args.config)
        .with_context(|| format!("failed to load config from {}", args.config))?;

    let raw = tokio::fs::read_to_string(&args.tokens)
        .await
        .with_context(|| format!("failed to read {}", args.tokens.display()))?;
    let tokens: Vec<TokenRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse token records in {}", args.tokens.display()))?;
    tracing::info!("Loaded {} tokens from {}", tokens.len(), args.tokens.display());

    let reference = match &args.reference {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let series = parse_reference(&raw)?;
            tracing::info!("Loaded {} reference prices from {}", series.len(), path.display());
            Some(series)
        }
        None => {
            tracing::warn!("No reference series; reference-relative metrics and SMA sweep skipped");
            None
        }
    };

    let pipeline = AnalysisPipeline::new(config)?;
    let run = pipeline.run(&tokens, reference.as_ref(), as_of);
    let report = &run.report;

    tracing::info!(
        "Bull vs Bear (annualized ROI): n = {}/{}, p = {}, r = {:?}",
        report.primary_test.n1,
        report.primary_test.n2,
        fmt_p(report.primary_test.p_value),
        report.primary_test.effect_size
    );

    match format {
        OutputFormat::Text => println!("{}", format_text_report(report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }

    if let Some(output_path) = &args.output {
        let json = serde_json::to_string_pretty(report)?;
        tokio::fs::write(output_path, json)
            .await
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        tracing::info!("Report written to {}", output_path.display());
    }

    if let Some(tokens_path) = &args.tokens_output {
        let json = serde_json::to_string_pretty(&run.tokens)?;
        tokio::fs::write(tokens_path, json)
            .await
            .with_context(|| format!("failed to write {}", tokens_path.display()))?;
        tracing::info!("{} token records written to {}", run.tokens.len(), tokens_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use launch_cycle_analysis::run_analysis;
    use launch_cycle_core::AnalysisConfig;

    // ============================================
    // OutputFormat Tests
    // ============================================

    #[test]
    fn output_format_parse() {
        assert_eq!(OutputFormat::parse("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::parse("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::parse("xml").is_err());
    }

    // ============================================
    // Input Parsing Tests
    // ============================================

    #[test]
    fn parse_reference_chart_object() {
        let series = parse_reference(r#"{"prices": [[1577836800000, 7200.5], [1577923200000, 7000.0]]}"#).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.latest(), Some(7000.0));
    }

    #[test]
    fn parse_reference_bare_pairs() {
        let series = parse_reference("[[1577836800000, 1.0]]").unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn parse_reference_rejects_garbage() {
        assert!(parse_reference(r#"{"foo": 1}"#).is_err());
    }

    #[test]
    fn parse_as_of_formats() {
        assert_eq!(
            parse_as_of(Some("2024-06-01")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert!(parse_as_of(Some("06/01/2024")).is_err());
        assert!(parse_as_of(None).is_ok());
    }

    // ============================================
    // Report Formatting Tests
    // ============================================

    #[test]
    fn format_text_report_contains_key_sections() {
        let mut config = AnalysisConfig::default();
        config.bootstrap.n_resamples = 100;
        let report = run_analysis(&[], None, config, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()).unwrap();

        let text = format_text_report(&report);

        assert!(text.contains("LAUNCH CYCLE ANALYSIS RESULTS"));
        assert!(text.contains("BULL VS BEAR: ANNUALIZED ROI"));
        assert!(text.contains("INSUFFICIENT DATA"));
        assert!(text.contains("shift -2 months"));
        assert!(text.contains("As of: 2024-06-01"));
    }

    #[test]
    fn fmt_helpers_handle_absent() {
        assert_eq!(fmt_pct(None), "n/a");
        assert_eq!(fmt_pct(Some(0.125)), "+12.5%");
        assert_eq!(fmt_p(Some(0.04321)), "0.0432");
    }
}
