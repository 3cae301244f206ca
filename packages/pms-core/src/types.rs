//! Core data types for the portfolio performance engine.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Allowed deviation of the summed holding weights from 100%.
pub const WEIGHT_TOLERANCE: f64 = 0.01;

/// One instrument position within a portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Holding {
    /// Instrument symbol (uppercase)
    pub symbol: String,
    /// Target allocation percentage (0, 100]
    pub weight_pct: f64,
    /// Price per unit of the instrument
    pub unit_price: f64,
    /// Realized return over the measurement period, in percent
    pub period_return_pct: f64,
}

impl Holding {
    /// Create a new holding. The symbol is normalised to uppercase.
    pub fn new(symbol: &str, weight_pct: f64, unit_price: f64, period_return_pct: f64) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            weight_pct,
            unit_price,
            period_return_pct,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(Error::InvalidInput("holding symbol must not be empty".to_string()));
        }
        if !(self.weight_pct > 0.0 && self.weight_pct <= 100.0) {
            return Err(Error::InvalidInput(format!(
                "weight for {} must be in (0, 100], got {}",
                self.symbol, self.weight_pct
            )));
        }
        if !(self.unit_price.is_finite() && self.unit_price > 0.0) {
            return Err(Error::InvalidInput(format!(
                "unit price for {} must be positive, got {}",
                self.symbol, self.unit_price
            )));
        }
        if !self.period_return_pct.is_finite() {
            return Err(Error::InvalidInput(format!(
                "period return for {} must be finite",
                self.symbol
            )));
        }
        Ok(())
    }
}

/// Wire form of a portfolio; every deserialised portfolio passes through
/// [`Portfolio::new`].
#[derive(Debug, Clone, Deserialize)]
struct PortfolioSnapshot {
    capital: f64,
    holdings: Vec<Holding>,
}

impl TryFrom<PortfolioSnapshot> for Portfolio {
    type Error = Error;

    fn try_from(snapshot: PortfolioSnapshot) -> Result<Self> {
        Portfolio::new(snapshot.capital, snapshot.holdings)
    }
}

/// An immutable portfolio snapshot: capital plus weighted holdings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "PortfolioSnapshot")]
pub struct Portfolio {
    capital: f64,
    holdings: Vec<Holding>,
}

impl Portfolio {
    /// Build a validated portfolio.
    ///
    /// Fails with [`Error::InvalidInput`] if capital is not positive, the
    /// holdings list is empty, a symbol is blank or repeated, a weight or price
    /// is out of range, or the weights do not sum to 100 within
    /// [`WEIGHT_TOLERANCE`].
    pub fn new(capital: f64, holdings: Vec<Holding>) -> Result<Self> {
        let holdings = holdings
            .into_iter()
            .map(|h| Holding {
                symbol: h.symbol.trim().to_uppercase(),
                ..h
            })
            .collect();
        let portfolio = Self { capital, holdings };
        portfolio.validate()?;
        Ok(portfolio)
    }

    /// Re-check every portfolio invariant.
    pub fn validate(&self) -> Result<()> {
        if !(self.capital.is_finite() && self.capital > 0.0) {
            return Err(Error::InvalidInput(format!(
                "capital must be positive, got {}",
                self.capital
            )));
        }
        if self.holdings.is_empty() {
            return Err(Error::InvalidInput("portfolio has no holdings".to_string()));
        }

        let mut seen = HashSet::with_capacity(self.holdings.len());
        for holding in &self.holdings {
            holding.validate()?;
            if !seen.insert(holding.symbol.as_str()) {
                return Err(Error::InvalidInput(format!(
                    "duplicate holding symbol: {}",
                    holding.symbol
                )));
            }
        }

        let total_weight = self.total_weight();
        if (total_weight - 100.0).abs() > WEIGHT_TOLERANCE {
            return Err(Error::InvalidInput(format!(
                "weights must sum to 100, got {total_weight}"
            )));
        }

        self.validate_magnitudes()
    }

    /// Every derived amount must be representable, so valuation never yields inf/NaN.
    fn validate_magnitudes(&self) -> Result<()> {
        let mut total_value = 0.0;
        for holding in &self.holdings {
            let current_value = self.current_value(holding);
            if !(self.invested_amount(holding).is_finite()
                && self.units(holding).is_finite()
                && current_value.is_finite())
            {
                return Err(Error::InvalidInput(format!(
                    "valuation of {} overflows",
                    holding.symbol
                )));
            }
            total_value += current_value;
        }

        let return_pct = (total_value - self.capital) / self.capital * 100.0;
        if !(total_value.is_finite() && return_pct.is_finite()) {
            return Err(Error::InvalidInput(
                "portfolio value overflows".to_string(),
            ));
        }
        Ok(())
    }

    /// Total capital to allocate.
    pub fn capital(&self) -> f64 {
        self.capital
    }

    /// Holdings in display order.
    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// Sum of all holding weights, in percent.
    pub fn total_weight(&self) -> f64 {
        self.holdings.iter().map(|h| h.weight_pct).sum()
    }

    /// Get the number of holdings.
    pub fn holding_count(&self) -> usize {
        self.holdings.len()
    }

    /// Find a holding by symbol (case insensitive).
    pub fn find_holding(&self, symbol: &str) -> Option<&Holding> {
        let symbol_upper = symbol.trim().to_uppercase();
        self.holdings.iter().find(|h| h.symbol == symbol_upper)
    }

    /// Amount of capital allocated to `holding`.
    pub fn invested_amount(&self, holding: &Holding) -> f64 {
        self.capital * (holding.weight_pct / 100.0)
    }

    /// Number of units bought for `holding`.
    pub fn units(&self, holding: &Holding) -> f64 {
        self.invested_amount(holding) / holding.unit_price
    }

    /// Mark-to-market value of `holding` after its period return.
    pub fn current_value(&self, holding: &Holding) -> f64 {
        self.invested_amount(holding) * (1.0 + holding.period_return_pct / 100.0)
    }

    /// Same capital, different holdings.
    pub fn with_holdings(&self, holdings: Vec<Holding>) -> Result<Self> {
        Self::new(self.capital, holdings)
    }

    /// Same holdings, different capital.
    pub fn with_capital(&self, capital: f64) -> Result<Self> {
        Self::new(capital, self.holdings.clone())
    }
}

/// Market reference used for relative metrics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BenchmarkContext {
    /// Benchmark return over the period, in percent
    pub benchmark_return_pct: f64,
    /// Period-matched risk-free rate as a decimal (0.05 = 5%)
    pub risk_free_rate: f64,
    /// Systematic-risk coefficient relative to the benchmark
    pub beta: f64,
    /// Market return as a decimal, used by Jensen's alpha
    pub market_return: f64,
}

impl BenchmarkContext {
    /// Build a validated benchmark context.
    ///
    /// A beta of zero is accepted; it makes the Treynor ratio undefined.
    pub fn new(
        benchmark_return_pct: f64,
        risk_free_rate: f64,
        beta: f64,
        market_return: f64,
    ) -> Result<Self> {
        let context = Self {
            benchmark_return_pct,
            risk_free_rate,
            beta,
            market_return,
        };
        context.validate()?;
        Ok(context)
    }

    /// Re-check the context invariants.
    pub fn validate(&self) -> Result<()> {
        if !self.benchmark_return_pct.is_finite() {
            return Err(Error::InvalidInput(
                "benchmark return must be finite".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.risk_free_rate) {
            return Err(Error::InvalidInput(format!(
                "risk-free rate must be a decimal in [0, 1], got {}",
                self.risk_free_rate
            )));
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(Error::InvalidInput(format!(
                "beta must be non-negative, got {}",
                self.beta
            )));
        }
        if !self.market_return.is_finite() {
            return Err(Error::InvalidInput("market return must be finite".to_string()));
        }
        if !(self.beta * (self.market_return - self.risk_free_rate)).is_finite() {
            return Err(Error::InvalidInput(
                "beta times market risk premium overflows".to_string(),
            ));
        }
        Ok(())
    }
}

/// A ratio that may be undefined because its denominator is zero or missing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Ratio {
    /// A computed ratio
    Value(f64),
    /// Denominator was zero or unavailable; rendered as `N/A`
    Undefined,
}

impl Ratio {
    /// Divide, yielding `Undefined` for a zero, missing or non-finite denominator.
    pub fn checked_div(numerator: f64, denominator: Option<f64>) -> Self {
        match denominator {
            Some(d) if d.is_finite() && d != 0.0 && numerator.is_finite() => {
                Ratio::Value(numerator / d)
            }
            _ => Ratio::Undefined,
        }
    }

    /// The numeric value, or `None` when undefined.
    pub fn value(&self) -> Option<f64> {
        match self {
            Ratio::Value(v) => Some(*v),
            Ratio::Undefined => None,
        }
    }

    /// Whether the ratio could not be computed.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Ratio::Undefined)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Value(v) => fmt::Display::fmt(v, f),
            Ratio::Undefined => f.pad("N/A"),
        }
    }
}

/// Sizing and mark-to-market value of one holding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Valuation {
    /// The holding being valued
    pub holding: Holding,
    /// Capital allocated to the holding
    pub invested_amount: f64,
    /// Units bought at the holding's unit price
    pub units: f64,
    /// Invested amount after the period return
    pub current_value: f64,
}

impl Valuation {
    /// Unrealized gain/loss in currency.
    pub fn gain_loss(&self) -> f64 {
        self.current_value - self.invested_amount
    }
}

/// Performance summary of one evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceResult {
    /// Aggregate portfolio return over the period, in percent
    pub portfolio_return_pct: f64,
    /// Benchmark return over the period, in percent
    pub benchmark_return_pct: f64,
    /// Portfolio return minus benchmark return, in percent
    pub alpha_pct: f64,
    /// Excess return over volatility
    pub sharpe: Ratio,
    /// Excess return over beta
    pub treynor: Ratio,
    /// Jensen's alpha as a decimal
    pub jensen: f64,
    /// Beta used for the ratios
    pub beta: f64,
    /// Sum of all holdings' current value
    pub total_value: f64,
    /// Sum of all invested amounts
    pub total_invested: f64,
    /// Total value minus total invested
    pub total_gain_loss: f64,
    /// Number of holdings
    pub holding_count: usize,
    /// Number of holdings with gains
    pub holdings_in_profit: usize,
    /// Number of holdings with losses
    pub holdings_in_loss: usize,
}

/// API response wrapper used by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
