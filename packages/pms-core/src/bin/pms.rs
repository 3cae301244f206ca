//! PMS CLI - Command line interface for portfolio performance analytics.
//!
//! Every command prints an `ApiResponse` JSON document on stdout; logs go to stderr.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use pms_core::{
    benchmark_return_pct, next_billing_date, ApiResponse, BenchmarkContext, ModelPortfolio,
    PerformanceEngine, PmsConfig, PortfolioSource, RiskProfile, SnapshotFile,
};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "pms")]
#[command(about = "Portfolio performance CLI - allocation, valuation and risk ratios")]
#[command(version)]
struct Cli {
    /// Config file (defaults to PMS_CONFIG_FILE or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a portfolio snapshot file
    Evaluate {
        /// Snapshot JSON file
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Volatility override (decimal)
        #[arg(long)]
        volatility: Option<f64>,
    },
    /// Build and evaluate a risk-profile model portfolio
    Model {
        /// Risk profile (conservative, balanced, aggressive)
        #[arg(short, long)]
        profile: String,
        /// Capital to allocate
        #[arg(short, long)]
        capital: f64,
        /// Raw allocation weights (comma-separated, normalised to 100)
        #[arg(short, long, value_delimiter = ',')]
        weights: Vec<f64>,
        /// Period returns in percent (comma-separated)
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
        returns: Vec<f64>,
        /// Volatility (decimal)
        #[arg(long)]
        volatility: Option<f64>,
        /// Beta override
        #[arg(long)]
        beta: Option<f64>,
    },
    /// Benchmark return between two index levels
    Benchmark {
        /// Current index level
        #[arg(long)]
        current: Option<f64>,
        /// Previous index level
        #[arg(long)]
        previous: Option<f64>,
    },
    /// Next billing date
    Billing {
        /// Start date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        from: Option<NaiveDate>,
    },
    /// List risk profiles and their instruments
    Profiles,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PmsConfig::load_from_path(path)?,
        None => PmsConfig::load()?,
    };

    let output = match cli.command {
        Commands::Evaluate { file, volatility } => handle_evaluate(&config, file, volatility),
        Commands::Model {
            profile,
            capital,
            weights,
            returns,
            volatility,
            beta,
        } => handle_model(&config, &profile, capital, &weights, &returns, volatility, beta),
        Commands::Benchmark { current, previous } => handle_benchmark(&config, current, previous),
        Commands::Billing { from } => handle_billing(&config, from),
        Commands::Profiles => handle_profiles(),
    };

    println!("{}", output);
    Ok(())
}

fn render<T: Serialize>(response: &ApiResponse<T>) -> String {
    serde_json::to_string_pretty(response)
        .unwrap_or_else(|e| format!(r#"{{"ok": false, "error": "{}"}}"#, e))
}

fn render_result<T: Serialize>(result: pms_core::Result<T>) -> String {
    match result {
        Ok(data) => render(&ApiResponse::ok(data)),
        Err(e) => {
            tracing::warn!("command failed: {}", e);
            render(&ApiResponse::<()>::err(e.to_string()))
        }
    }
}

fn handle_evaluate(config: &PmsConfig, file: Option<PathBuf>, volatility: Option<f64>) -> String {
    let path = file
        .or_else(|| config.snapshot_path.clone())
        .unwrap_or_else(SnapshotFile::default_path);
    tracing::info!(path = %path.display(), "evaluating snapshot");

    render_result(SnapshotFile::open(path).and_then(|source| {
        let volatility = volatility.or(source.volatility()).or(config.volatility);
        PerformanceEngine::new().evaluate(&source.portfolio()?, &source.benchmark()?, volatility)
    }))
}

fn handle_model(
    config: &PmsConfig,
    profile: &str,
    capital: f64,
    weights: &[f64],
    returns: &[f64],
    volatility: Option<f64>,
    beta: Option<f64>,
) -> String {
    render_result(
        build_model(config, profile, capital, weights, returns, beta).and_then(|model| {
            let model = match volatility.or(config.volatility) {
                Some(v) => model.with_volatility(v),
                None => model,
            };
            model.evaluate(&PerformanceEngine::new())
        }),
    )
}

fn build_model(
    config: &PmsConfig,
    profile: &str,
    capital: f64,
    weights: &[f64],
    returns: &[f64],
    beta: Option<f64>,
) -> pms_core::Result<ModelPortfolio> {
    let profile: RiskProfile = profile.parse()?;
    let benchmark = BenchmarkContext::new(
        benchmark_return_pct(config.benchmark_current_level, config.benchmark_previous_level)?,
        config.risk_free_rate,
        beta.unwrap_or(config.beta),
        config.market_return,
    )?;

    ModelPortfolio::new(profile, capital, weights, returns, benchmark)
}

fn handle_benchmark(config: &PmsConfig, current: Option<f64>, previous: Option<f64>) -> String {
    let current = current.unwrap_or(config.benchmark_current_level);
    let previous = previous.unwrap_or(config.benchmark_previous_level);

    render_result(benchmark_return_pct(current, previous).map(|pct| {
        json!({
            "current_level": current,
            "previous_level": previous,
            "benchmark_return_pct": pct,
        })
    }))
}

fn handle_billing(config: &PmsConfig, from: Option<NaiveDate>) -> String {
    let from = from.unwrap_or_else(|| Local::now().date_naive());

    render_result(next_billing_date(from, config.billing_cycle_days).map(|next| {
        json!({
            "from": from,
            "cycle_days": config.billing_cycle_days,
            "next_billing_date": next,
        })
    }))
}

fn handle_profiles() -> String {
    let profiles: Vec<_> = RiskProfile::ALL
        .iter()
        .map(|profile| {
            json!({
                "profile": profile,
                "name": profile.name(),
                "instruments": profile.instruments(),
            })
        })
        .collect();

    render(&ApiResponse::ok(json!({ "profiles": profiles })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::fs;
    use tempfile::tempdir;

    fn parse(output: &str) -> Value {
        serde_json::from_str(output).unwrap()
    }

    const SNAPSHOT: &str = r#"{
        "capital": 100000.0,
        "holdings": [
            {"symbol": "INFY", "weight_pct": 100.0, "unit_price": 1500.0, "period_return_pct": 12.0}
        ],
        "benchmark": {"benchmark_return_pct": 3.77, "risk_free_rate": 0.05, "beta": 1.0, "market_return": 0.12}
    }"#;

    #[test]
    fn test_parse_model_command_with_negative_returns() {
        let cli = Cli::try_parse_from([
            "pms", "model", "--profile", "balanced", "--capital", "1000000", "--weights",
            "1,1,1,1", "--returns", "-2,4,3,-1",
        ])
        .unwrap();

        match cli.command {
            Commands::Model {
                weights, returns, ..
            } => {
                assert_eq!(weights, vec![1.0, 1.0, 1.0, 1.0]);
                assert_eq!(returns, vec![-2.0, 4.0, 3.0, -1.0]);
            }
            _ => panic!("expected model command"),
        }
    }

    #[test]
    fn test_build_model_unknown_profile() {
        let result = build_model(
            &PmsConfig::default(),
            "reckless",
            1000.0,
            &[1.0; 4],
            &[0.0; 4],
            None,
        );
        assert!(matches!(result, Err(pms_core::Error::UnknownRiskProfile(_))));
    }

    #[test]
    fn test_build_model_beta_flag_overrides_config() {
        let config = PmsConfig {
            beta: 0.8,
            ..Default::default()
        };

        let from_config = build_model(&config, "aggressive", 1000.0, &[1.0; 4], &[0.0; 4], None)
            .unwrap();
        assert_eq!(from_config.benchmark().unwrap().beta, 0.8);

        let from_flag =
            build_model(&config, "aggressive", 1000.0, &[1.0; 4], &[0.0; 4], Some(1.4)).unwrap();
        assert_eq!(from_flag.benchmark().unwrap().beta, 1.4);
    }

    #[test]
    fn test_model_volatility_flag_overrides_config() {
        let config = PmsConfig {
            volatility: Some(0.2),
            ..Default::default()
        };
        let weights = [25.0; 4];
        let returns = [10.0; 4];

        let output = parse(&handle_model(
            &config, "conservative", 1000.0, &weights, &returns, None, None,
        ));
        assert_eq!(output["ok"], true);
        assert!(output["data"]["performance"]["sharpe"].is_number());

        let output = parse(&handle_model(
            &config,
            "conservative",
            1000.0,
            &weights,
            &returns,
            Some(0.0),
            None,
        ));
        assert!(output["data"]["performance"]["sharpe"].is_null());
    }

    #[test]
    fn test_model_error_is_reported_as_json() {
        let output = parse(&handle_model(
            &PmsConfig::default(),
            "balanced",
            0.0,
            &[1.0; 4],
            &[0.0; 4],
            None,
            None,
        ));
        assert_eq!(output["ok"], false);
        assert!(output["error"].as_str().unwrap().contains("Invalid input"));
    }

    #[test]
    fn test_evaluate_volatility_precedence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(&path, SNAPSHOT).unwrap();

        let config = PmsConfig {
            volatility: Some(0.2),
            snapshot_path: Some(path.clone()),
            ..Default::default()
        };

        // config path and config volatility: (0.12 - 0.05) / 0.2
        let output = parse(&handle_evaluate(&config, None, None));
        let sharpe = output["data"]["performance"]["sharpe"].as_f64().unwrap();
        assert!((sharpe - 0.35).abs() < 1e-9);

        // the flag wins over the config
        let output = parse(&handle_evaluate(&config, Some(path), Some(-1.0)));
        assert!(output["data"]["performance"]["sharpe"].is_null());
    }

    #[test]
    fn test_evaluate_missing_file() {
        let dir = tempdir().unwrap();
        let output = parse(&handle_evaluate(
            &PmsConfig::default(),
            Some(dir.path().join("missing.json")),
            None,
        ));
        assert_eq!(output["ok"], false);
    }

    #[test]
    fn test_benchmark_flags_override_config() {
        let config = PmsConfig::default();

        let output = parse(&handle_benchmark(&config, None, None));
        let pct = output["data"]["benchmark_return_pct"].as_f64().unwrap();
        assert!((pct - 800.0 / 21200.0 * 100.0).abs() < 1e-9);

        let output = parse(&handle_benchmark(&config, Some(110.0), Some(100.0)));
        let pct = output["data"]["benchmark_return_pct"].as_f64().unwrap();
        assert!((pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_billing_uses_config_cycle() {
        let config = PmsConfig {
            billing_cycle_days: 10,
            ..Default::default()
        };
        let from = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let output = parse(&handle_billing(&config, Some(from)));
        assert_eq!(output["data"]["next_billing_date"], "2026-10-29");
        assert_eq!(output["data"]["cycle_days"], 10);
    }

    #[test]
    fn test_profiles_lists_all() {
        let output = parse(&handle_profiles());
        let profiles = output["data"]["profiles"].as_array().unwrap();
        assert_eq!(profiles.len(), 3);
        assert_eq!(profiles[0]["profile"], "conservative");
    }
}
