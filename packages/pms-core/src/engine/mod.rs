//! Portfolio performance engine.
//!
//! Pure functions over a [`Portfolio`](crate::types::Portfolio) snapshot and a
//! [`BenchmarkContext`](crate::types::BenchmarkContext):
//!
//! - **Allocation**: invested amount, units and mark-to-market value per holding
//! - **Returns**: portfolio return and alpha versus the benchmark
//! - **Risk ratios**: Sharpe, Treynor, Jensen's alpha
//!
//! Nothing here holds state, logs or performs I/O.

mod allocation;
mod performance;
mod risk;

pub use allocation::{allocate, normalize_weights};
pub use performance::{
    benchmark_return_pct, portfolio_return, total_value, vs_benchmark, Evaluation,
    PerformanceEngine,
};
pub use risk::{jensens_alpha, risk_ratios, sharpe_ratio, treynor_ratio, RiskRatios};
