//! Data providers that supply portfolios and benchmark context to the engine.
//!
//! The engine never generates or fetches data itself; anything that can hand
//! over a [`Portfolio`] and a [`BenchmarkContext`] implements
//! [`PortfolioSource`].

mod snapshot;
mod universe;

pub use snapshot::{Snapshot, SnapshotFile};
pub use universe::{
    unit_price, ModelPortfolio, RiskProfile, DEFAULT_BENCHMARK_CURRENT_LEVEL,
    DEFAULT_BENCHMARK_PREVIOUS_LEVEL, PRICE_TABLE,
};

use crate::engine::{Evaluation, PerformanceEngine};
use crate::types::{BenchmarkContext, Portfolio};
use crate::Result;

/// Supplies the inputs of one evaluation.
pub trait PortfolioSource {
    /// The portfolio snapshot to evaluate.
    fn portfolio(&self) -> Result<Portfolio>;

    /// The market reference for relative metrics.
    fn benchmark(&self) -> Result<BenchmarkContext>;

    /// Volatility estimate for the Sharpe ratio, if the source has one.
    fn volatility(&self) -> Option<f64> {
        None
    }

    /// Evaluate this source's portfolio with the given engine.
    fn evaluate(&self, engine: &PerformanceEngine) -> Result<Evaluation> {
        engine.evaluate(&self.portfolio()?, &self.benchmark()?, self.volatility())
    }
}
