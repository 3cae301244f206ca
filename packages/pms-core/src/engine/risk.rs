//! Risk-adjusted performance ratios.
//!
//! Provides Sharpe ratio, Treynor ratio and Jensen's alpha. Returns arrive in
//! percent and are converted to decimals before any ratio is taken; rates in
//! [`BenchmarkContext`] are already decimals.

use crate::types::{BenchmarkContext, Ratio};
use serde::{Deserialize, Serialize};

/// The three risk-adjusted ratios of one evaluation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RiskRatios {
    pub sharpe: Ratio,
    pub treynor: Ratio,
    pub jensen: f64,
}

/// Calculate Sharpe, Treynor and Jensen for a portfolio return.
///
/// # Arguments
///
/// * `portfolio_return_pct` - Portfolio return over the period, in percent
/// * `benchmark` - Risk-free rate, beta and market return
/// * `volatility` - Dispersion of portfolio returns as a decimal, if known
pub fn risk_ratios(
    portfolio_return_pct: f64,
    benchmark: &BenchmarkContext,
    volatility: Option<f64>,
) -> RiskRatios {
    let r = portfolio_return_pct / 100.0;

    RiskRatios {
        sharpe: sharpe_ratio(r, benchmark.risk_free_rate, volatility),
        treynor: treynor_ratio(r, benchmark.risk_free_rate, benchmark.beta),
        jensen: jensens_alpha(r, benchmark.risk_free_rate, benchmark.beta, benchmark.market_return),
    }
}

/// Excess return over total risk: `(r - rf) / volatility`.
///
/// Undefined when volatility is missing, non-positive or non-finite.
pub fn sharpe_ratio(r: f64, risk_free_rate: f64, volatility: Option<f64>) -> Ratio {
    let volatility = volatility.filter(|v| *v > 0.0);
    Ratio::checked_div(r - risk_free_rate, volatility)
}

/// Excess return over systematic risk: `(r - rf) / beta`.
///
/// Undefined when beta is zero.
pub fn treynor_ratio(r: f64, risk_free_rate: f64, beta: f64) -> Ratio {
    Ratio::checked_div(r - risk_free_rate, Some(beta))
}

/// Jensen's alpha: `r - (rf + beta * (rm - rf))`.
pub fn jensens_alpha(r: f64, risk_free_rate: f64, beta: f64, market_return: f64) -> f64 {
    r - (risk_free_rate + beta * (market_return - risk_free_rate))
}
