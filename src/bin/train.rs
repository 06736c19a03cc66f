//! Walk-Forward Training Binary
//!
//! Trains the model bank on one or more feature CSVs (one per instrument) and
//! reports out-of-fold accuracy per model.

use anyhow::{Context, Result};
use autoanalyst::application::training::{TrainingConfig, train_walk_forward};
use autoanalyst::config::{TrainingEnvConfig, load_models_from_toml};
use autoanalyst::domain::dataset::{FeatureMatrix, TargetVector};
use autoanalyst::domain::performance::PerformanceSummary;
use autoanalyst::domain::results::TrainingReport;
use clap::{Parser, ValueEnum};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

const TARGET_COLUMN: &str = "target";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Walk-forward model training", long_about = None)]
struct Args {
    /// Feature CSV files, one per instrument (file stem is the instrument name)
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Model bank profile (baseline, optimized); overrides WF_PROFILE
    #[arg(long)]
    profile: Option<String>,

    /// Number of walk-forward folds; overrides WF_SPLITS
    #[arg(long)]
    splits: Option<usize>,

    /// Maximum number of selected features; overrides WF_MAX_FEATURES
    #[arg(long)]
    max_features: Option<usize>,

    /// Train the models of each fold in parallel
    #[arg(long)]
    parallel: bool,

    /// TOML file replacing the profile's model bank
    #[arg(long)]
    models: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let args = Args::parse();
    let mut env_config = TrainingEnvConfig::from_env()?;
    if let Some(profile) = &args.profile {
        env_config.profile = FromStr::from_str(profile)?;
    }
    if let Some(splits) = args.splits {
        env_config.n_splits = splits;
    }
    if let Some(max_features) = args.max_features {
        env_config.max_features = max_features;
    }
    env_config.parallel_models |= args.parallel;

    let mut config = env_config.training_config();
    if let Some(path) = &args.models {
        config = config.with_models(load_models_from_toml(path)?);
    }

    let mut reports = BTreeMap::new();
    for path in &args.input {
        let instrument = instrument_name(path);
        match train_file(path, &config, env_config.min_rows) {
            Ok(report) => {
                reports.insert(instrument, report);
            }
            Err(e) => warn!("Skipping {}: {:#}", instrument, e),
        }
    }

    let summary = PerformanceSummary::from_reports(&reports, env_config.min_confidence);

    match args.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "reports": reports,
                "summary": summary,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            for (instrument, report) in &reports {
                print_report(instrument, report);
            }
            if let Some(summary) = &summary {
                print_summary(summary);
            }
        }
    }

    Ok(())
}

fn instrument_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn train_file(path: &Path, config: &TrainingConfig, min_rows: usize) -> Result<TrainingReport> {
    let file = File::open(path).context(format!("Failed to open {}", path.display()))?;
    let (features, target) =
        load_dataset(file).context(format!("Failed to load {}", path.display()))?;

    if features.n_rows() < min_rows {
        anyhow::bail!(
            "{} rows is below the minimum of {} required for training",
            features.n_rows(),
            min_rows
        );
    }

    info!(
        "Loaded {}: {} rows, {} feature columns",
        path.display(),
        features.n_rows(),
        features.n_columns()
    );

    Ok(train_walk_forward(&features, &target, config)?)
}

/// Parse a feature CSV. Columns that hold anything other than numbers or
/// empty cells are ignored; `target` must hold 0/1 on every row.
fn load_dataset<R: Read>(reader: R) -> Result<(FeatureMatrix, TargetVector)> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let target_pos = headers
        .iter()
        .position(|h| h == TARGET_COLUMN)
        .context(format!("Missing '{}' column", TARGET_COLUMN))?;

    let mut cells: Vec<Vec<Option<f64>>> = vec![Vec::new(); headers.len()];
    let mut rejected: Vec<Option<(usize, String)>> = vec![None; headers.len()];
    let mut labels = Vec::new();

    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        for (pos, raw) in record.iter().enumerate() {
            if pos == target_pos {
                labels.push(parse_label(raw).context(format!("Row {}", line + 1))?);
                continue;
            }
            if rejected[pos].is_some() {
                continue;
            }
            match parse_cell(raw) {
                Some(value) => cells[pos].push(value),
                None => rejected[pos] = Some((line + 1, raw.to_string())),
            }
        }
    }

    for (name, reject) in headers.iter().zip(&rejected) {
        if let Some((row, value)) = reject {
            warn!(
                "Ignoring non-numeric column '{}' (row {} holds '{}')",
                name, row, value
            );
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .zip(rejected)
        .enumerate()
        .filter(|(pos, (_, reject))| *pos != target_pos && reject.is_none())
        .map(|(_, ((name, values), _))| (name, values))
        .collect::<Vec<_>>();
    if columns.is_empty() {
        anyhow::bail!("No numeric feature columns");
    }

    Ok((FeatureMatrix::from_columns(columns)?, TargetVector::new(labels)?))
}

/// `Some(None)` for a missing cell, `None` when the cell is not numeric.
fn parse_cell(raw: &str) -> Option<Option<f64>> {
    if raw.is_empty() {
        return Some(None);
    }
    let value = raw.parse::<f64>().ok()?;
    Some(if value.is_nan() { None } else { Some(value) })
}

fn parse_label(raw: &str) -> Result<u8> {
    match raw.parse::<f64>() {
        Ok(v) if v == 0.0 => Ok(0),
        Ok(v) if v == 1.0 => Ok(1),
        _ => anyhow::bail!("Invalid target '{}'. Must be 0 or 1", raw),
    }
}

fn print_report(instrument: &str, report: &TrainingReport) {
    println!("=== {} ===", instrument);
    println!("Selected features: {}", report.selected_features.join(", "));
    if !report.dropped_constant.is_empty() {
        println!("Dropped constant:  {}", report.dropped_constant.join(", "));
    }
    for score in &report.feature_scores {
        println!(
            "  {:<24} F = {:>10.3}  p = {:.4}",
            score.name, score.f_statistic, score.p_value
        );
    }
    println!("{:<20} {:>10} {:>10}", "Model", "Accuracy", "Samples");
    for (name, result) in &report.results {
        println!(
            "{:<20} {:>10.3} {:>10}",
            name, result.accuracy, result.sample_count
        );
    }
    for (name, error) in &report.failures {
        println!("{:<20} FAILED: {}", name, error);
    }
    if let Some((best, result)) = report.best_model() {
        println!("Best: {} ({:.3})", best, result.accuracy);
    }
    println!();
}

fn print_summary(summary: &PerformanceSummary) {
    println!("=== Summary ===");
    println!("Instruments:       {}", summary.total_instruments);
    println!("Without models:    {}", summary.instruments_without_models);
    println!("Average accuracy:  {:.3}", summary.average_accuracy);
    println!("Max accuracy:      {:.3}", summary.max_accuracy);
    println!("Min accuracy:      {:.3}", summary.min_accuracy);
    println!(
        "Success rate:      {:.1}% (> {:.2})",
        summary.success_rate * 100.0,
        summary.baseline
    );
    println!(
        "Above baseline:    {}",
        if summary.above_baseline() { "yes" } else { "no" }
    );
}
