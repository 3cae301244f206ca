//! PMS Core - Portfolio performance engine.
//!
//! This crate provides the analytics behind the portfolio dashboards:
//!
//! - **Allocation**: invested amount, units and mark-to-market value per holding
//! - **Returns**: portfolio return and alpha versus a benchmark
//! - **Risk ratios**: Sharpe ratio, Treynor ratio, Jensen's alpha
//! - **Providers**: JSON snapshots and risk-profile model portfolios
//!
//! # Example
//!
//! ```rust
//! use pms_core::{BenchmarkContext, Holding, PerformanceEngine, Portfolio};
//!
//! let portfolio = Portfolio::new(
//!     1_000_000.0,
//!     vec![
//!         Holding::new("INFY", 50.0, 100.0, 10.0),
//!         Holding::new("TCS", 50.0, 200.0, -10.0),
//!     ],
//! )?;
//! let benchmark = BenchmarkContext::new(3.77, 0.05, 1.1, 0.12)?;
//!
//! let evaluation = PerformanceEngine::new().evaluate(&portfolio, &benchmark, Some(0.15))?;
//! println!("Return: {:.2}%", evaluation.performance.portfolio_return_pct);
//! println!("Treynor: {:.4}", evaluation.performance.treynor);
//! # Ok::<(), pms_core::Error>(())
//! ```

pub mod billing;
pub mod config;
pub mod engine;
pub mod provider;
pub mod types;

// Re-export commonly used types
pub use types::{
    ApiResponse, BenchmarkContext, Holding, PerformanceResult, Portfolio, Ratio, Valuation,
    WEIGHT_TOLERANCE,
};

// Re-export main functionality
pub use billing::next_billing_date;
pub use config::PmsConfig;
pub use engine::{
    allocate, benchmark_return_pct, jensens_alpha, normalize_weights, portfolio_return,
    risk_ratios, sharpe_ratio, total_value, treynor_ratio, vs_benchmark, Evaluation,
    PerformanceEngine, RiskRatios,
};
pub use provider::{ModelPortfolio, PortfolioSource, RiskProfile, Snapshot, SnapshotFile};

/// Error types for pms-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown risk profile: {0}")]
    UnknownRiskProfile(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for pms-core operations.
pub type Result<T> = std::result::Result<T, Error>;
