//! Portfolio snapshots read from JSON files.
//!
//! A snapshot file is a flat JSON object:
//!
//! ```json
//! {
//!     "capital": 1000000.0,
//!     "holdings": [
//!         {"symbol": "TCS", "weight_pct": 100.0, "unit_price": 3800.0, "period_return_pct": 2.5}
//!     ],
//!     "benchmark": {"benchmark_return_pct": 3.77, "risk_free_rate": 0.05, "beta": 1.0, "market_return": 0.12},
//!     "volatility": 0.14
//! }
//! ```
//!
//! `volatility` is optional.

use super::PortfolioSource;
use crate::types::{BenchmarkContext, Holding, Portfolio};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything needed for one evaluation, in its on-disk form.
///
/// Nothing is validated while parsing; [`Snapshot::to_portfolio`] and
/// [`BenchmarkContext::validate`] report malformed data as
/// [`Error::InvalidInput`](crate::Error::InvalidInput).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    /// Total capital to allocate
    pub capital: f64,
    /// Weighted holdings
    pub holdings: Vec<Holding>,
    /// Market reference for the relative metrics
    pub benchmark: BenchmarkContext,
    /// Volatility estimate for the Sharpe ratio (decimal)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
}

impl Snapshot {
    /// Capture a portfolio and its benchmark for writing to disk.
    pub fn new(portfolio: &Portfolio, benchmark: BenchmarkContext, volatility: Option<f64>) -> Self {
        Self {
            capital: portfolio.capital(),
            holdings: portfolio.holdings().to_vec(),
            benchmark,
            volatility,
        }
    }

    /// Build the validated portfolio described by this snapshot.
    pub fn to_portfolio(&self) -> Result<Portfolio> {
        Portfolio::new(self.capital, self.holdings.clone())
    }
}

/// A [`PortfolioSource`] backed by a JSON snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    /// Path the snapshot was read from
    path: PathBuf,
    /// Validated portfolio
    portfolio: Portfolio,
    /// Validated benchmark context
    benchmark: BenchmarkContext,
    /// Volatility estimate, if the file has one
    volatility: Option<f64>,
}

impl SnapshotFile {
    /// Get the default snapshot file path.
    ///
    /// Default path: `~/.pms/snapshot.json`
    /// Can be overridden with `PMS_SNAPSHOT_FILE` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("PMS_SNAPSHOT_FILE") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".pms/snapshot.json"))
            .unwrap_or_else(|| PathBuf::from("snapshot.json"))
    }

    /// Load the snapshot at the default path.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path())
    }

    /// Load a snapshot from a specific path.
    ///
    /// A missing file is an error: there is nothing to evaluate without data.
    /// Unparseable JSON is [`Error::Json`](crate::Error::Json); a parseable
    /// file with an invalid portfolio or benchmark is
    /// [`Error::InvalidInput`](crate::Error::InvalidInput).
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let snapshot = Self::load_from_path(&path)?;

        let portfolio = snapshot.to_portfolio()?;
        snapshot.benchmark.validate()?;
        tracing::debug!(
            path = %path.display(),
            holdings = portfolio.holding_count(),
            "loaded portfolio snapshot"
        );

        Ok(Self {
            path,
            portfolio,
            benchmark: snapshot.benchmark,
            volatility: snapshot.volatility,
        })
    }

    fn load_from_path(path: &Path) -> Result<Snapshot> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Get the path the snapshot was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PortfolioSource for SnapshotFile {
    fn portfolio(&self) -> Result<Portfolio> {
        Ok(self.portfolio.clone())
    }

    fn benchmark(&self) -> Result<BenchmarkContext> {
        Ok(self.benchmark)
    }

    fn volatility(&self) -> Option<f64> {
        self.volatility
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use tempfile::tempdir;

    const SNAPSHOT: &str = r#"{
        "capital": 1000000.0,
        "holdings": [
            {"symbol": "icicibank", "weight_pct": 60.0, "unit_price": 1150.0, "period_return_pct": 8.0},
            {"symbol": "TCS", "weight_pct": 40.0, "unit_price": 3800.0, "period_return_pct": -2.5}
        ],
        "benchmark": {
            "benchmark_return_pct": 3.77,
            "risk_free_rate": 0.05,
            "beta": 1.05,
            "market_return": 0.12
        },
        "volatility": 0.14
    }"#;

    fn write_snapshot(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_open_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(&path, SNAPSHOT).unwrap();

        let source = SnapshotFile::open(&path).unwrap();
        assert_eq!(source.path(), path.as_path());

        let portfolio = source.portfolio().unwrap();
        assert_eq!(portfolio.holdings()[0].symbol, "ICICIBANK");
        assert_eq!(portfolio.capital(), 1_000_000.0);
        assert_eq!(source.benchmark().unwrap().beta, 1.05);
        assert_eq!(source.volatility(), Some(0.14));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        let result = SnapshotFile::open(dir.path().join("missing.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_open_rejects_bad_weight_sum() {
        let (_dir, path) =
            write_snapshot(&SNAPSHOT.replace("\"weight_pct\": 40.0", "\"weight_pct\": 30.0"));

        assert!(matches!(
            SnapshotFile::open(&path),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_open_rejects_zero_capital() {
        let (_dir, path) = write_snapshot(
            &SNAPSHOT.replace("\"capital\": 1000000.0", "\"capital\": 0.0"),
        );

        assert!(matches!(
            SnapshotFile::open(&path),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_open_rejects_unparseable_json() {
        let (_dir, path) = write_snapshot("{\"capital\": ");
        assert!(matches!(SnapshotFile::open(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_snapshot_round_trips_through_file() {
        let portfolio = Portfolio::new(
            250_000.0,
            vec![
                Holding::new("ITC", 70.0, 480.0, 3.0),
                Holding::new("SBI", 30.0, 720.0, -1.0),
            ],
        )
        .unwrap();
        let benchmark = BenchmarkContext::new(2.0, 0.05, 0.9, 0.12).unwrap();
        let snapshot = Snapshot::new(&portfolio, benchmark, None);

        let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("capital").is_some());
        assert!(json.get("portfolio").is_none());

        let (_dir, path) = write_snapshot(&json.to_string());
        let source = SnapshotFile::open(&path).unwrap();
        assert_eq!(source.portfolio().unwrap(), portfolio);
        assert_eq!(source.volatility(), None);
    }

    #[test]
    fn test_open_rejects_invalid_benchmark() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(&path, SNAPSHOT.replace("\"beta\": 1.05", "\"beta\": -1.0")).unwrap();

        assert!(matches!(
            SnapshotFile::open(&path),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_volatility_is_optional() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let mut value: serde_json::Value = serde_json::from_str(SNAPSHOT).unwrap();
        value.as_object_mut().unwrap().remove("volatility");
        fs::write(&path, value.to_string()).unwrap();

        let source = SnapshotFile::open(&path).unwrap();
        assert_eq!(source.volatility(), None);
    }
}
