//! Portfolio return, benchmark comparison and the evaluation facade.

use super::allocation::allocate;
use super::risk::risk_ratios;
use crate::types::{BenchmarkContext, PerformanceResult, Portfolio, Valuation};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Sum of the holdings' mark-to-market values.
pub fn total_value(valuations: &[Valuation]) -> f64 {
    valuations.iter().map(|v| v.current_value).sum()
}

/// Aggregate return of the valued holdings against the starting capital, in percent.
pub fn portfolio_return(valuations: &[Valuation], capital: f64) -> Result<f64> {
    if !(capital.is_finite() && capital > 0.0) {
        return Err(Error::InvalidInput(format!(
            "capital must be positive, got {capital}"
        )));
    }
    let return_pct = (total_value(valuations) - capital) / capital * 100.0;
    if !return_pct.is_finite() {
        return Err(Error::InvalidInput(
            "portfolio return is not representable".to_string(),
        ));
    }
    Ok(return_pct)
}

/// Alpha in percent: portfolio return minus benchmark return.
pub fn vs_benchmark(portfolio_return_pct: f64, benchmark_return_pct: f64) -> f64 {
    portfolio_return_pct - benchmark_return_pct
}

/// Percent change of a benchmark index between two levels.
pub fn benchmark_return_pct(current_level: f64, previous_level: f64) -> Result<f64> {
    if !(previous_level.is_finite() && previous_level > 0.0) {
        return Err(Error::InvalidInput(format!(
            "previous benchmark level must be positive, got {previous_level}"
        )));
    }
    if !current_level.is_finite() {
        return Err(Error::InvalidInput(
            "current benchmark level must be finite".to_string(),
        ));
    }
    Ok((current_level - previous_level) / previous_level * 100.0)
}

/// Valuations plus the performance summary of one evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evaluation {
    pub valuations: Vec<Valuation>,
    pub performance: PerformanceResult,
}

/// Stateless entry point that runs allocation, return and ratio calculations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceEngine;

impl PerformanceEngine {
    /// Create an engine. It carries no state, so one instance can be shared freely.
    pub fn new() -> Self {
        Self
    }

    /// Evaluate a portfolio against a benchmark.
    ///
    /// `volatility` is a decimal dispersion measure; pass `None` when it is not
    /// known and the Sharpe ratio will be reported as undefined.
    pub fn evaluate(
        &self,
        portfolio: &Portfolio,
        benchmark: &BenchmarkContext,
        volatility: Option<f64>,
    ) -> Result<Evaluation> {
        benchmark.validate()?;
        let valuations = allocate(portfolio)?;

        let portfolio_return_pct = portfolio_return(&valuations, portfolio.capital())?;
        let ratios = risk_ratios(portfolio_return_pct, benchmark, volatility);
        if !ratios.jensen.is_finite() {
            return Err(Error::InvalidInput(
                "Jensen's alpha is not representable for these inputs".to_string(),
            ));
        }

        let total_value = total_value(&valuations);
        let total_invested: f64 = valuations.iter().map(|v| v.invested_amount).sum();

        let holdings_in_profit = valuations.iter().filter(|v| v.gain_loss() > 0.0).count();
        let holdings_in_loss = valuations.iter().filter(|v| v.gain_loss() < 0.0).count();

        let performance = PerformanceResult {
            portfolio_return_pct,
            benchmark_return_pct: benchmark.benchmark_return_pct,
            alpha_pct: vs_benchmark(portfolio_return_pct, benchmark.benchmark_return_pct),
            sharpe: ratios.sharpe,
            treynor: ratios.treynor,
            jensen: ratios.jensen,
            beta: benchmark.beta,
            total_value,
            total_invested,
            total_gain_loss: total_value - total_invested,
            holding_count: valuations.len(),
            holdings_in_profit,
            holdings_in_loss,
        };

        Ok(Evaluation {
            valuations,
            performance,
        })
    }
}
