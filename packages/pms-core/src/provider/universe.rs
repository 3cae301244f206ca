//! Built-in instrument universe and risk-profile model portfolios.

use super::PortfolioSource;
use crate::engine::normalize_weights;
use crate::types::{BenchmarkContext, Holding, Portfolio};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Benchmark index level at the end of the default measurement window.
pub const DEFAULT_BENCHMARK_CURRENT_LEVEL: f64 = 22_000.0;
/// Benchmark index level at the start of the default measurement window.
pub const DEFAULT_BENCHMARK_PREVIOUS_LEVEL: f64 = 21_200.0;

/// Reference unit prices of the built-in instruments.
pub static PRICE_TABLE: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    HashMap::from([
        ("HDFCBANK", 1600.0),
        ("INFY", 1500.0),
        ("ITC", 480.0),
        ("SBI", 720.0),
        ("ICICIBANK", 1150.0),
        ("RELIANCE", 2800.0),
        ("TCS", 3800.0),
        ("MARUTI", 10500.0),
        ("ADANIENT", 3100.0),
        ("ZOMATO", 195.0),
        ("IRCTC", 890.0),
        ("TATAMOTORS", 950.0),
    ])
});

/// Look up the reference unit price of an instrument.
pub fn unit_price(symbol: &str) -> Option<f64> {
    PRICE_TABLE.get(symbol.trim().to_uppercase().as_str()).copied()
}

/// Investor risk appetite, selecting the instrument pool of a model portfolio.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Conservative,
    Balanced,
    Aggressive,
}

impl RiskProfile {
    pub const ALL: [RiskProfile; 3] = [
        RiskProfile::Conservative,
        RiskProfile::Balanced,
        RiskProfile::Aggressive,
    ];

    /// Instruments held by this profile's model portfolio, in display order.
    pub fn instruments(&self) -> &'static [&'static str] {
        match self {
            RiskProfile::Conservative => &["HDFCBANK", "INFY", "ITC", "SBI"],
            RiskProfile::Balanced => &["ICICIBANK", "RELIANCE", "TCS", "MARUTI"],
            RiskProfile::Aggressive => &["ADANIENT", "ZOMATO", "IRCTC", "TATAMOTORS"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RiskProfile::Conservative => "Conservative",
            RiskProfile::Balanced => "Balanced",
            RiskProfile::Aggressive => "Aggressive",
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RiskProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "conservative" => Ok(RiskProfile::Conservative),
            "balanced" => Ok(RiskProfile::Balanced),
            "aggressive" => Ok(RiskProfile::Aggressive),
            other => Err(Error::UnknownRiskProfile(other.to_string())),
        }
    }
}

/// A model portfolio built from a risk profile's instrument pool.
///
/// Raw allocation weights are normalised to 100%; unit prices come from
/// [`PRICE_TABLE`].
#[derive(Debug, Clone)]
pub struct ModelPortfolio {
    profile: RiskProfile,
    capital: f64,
    weights_pct: Vec<f64>,
    period_returns_pct: Vec<f64>,
    benchmark: BenchmarkContext,
    volatility: Option<f64>,
}

impl ModelPortfolio {
    /// Create a model portfolio.
    ///
    /// # Arguments
    ///
    /// * `profile` - Risk profile selecting the instrument pool
    /// * `capital` - Total capital to allocate
    /// * `raw_weights` - One relative weight per instrument, normalised to 100%
    /// * `period_returns_pct` - One realized period return per instrument, in percent
    /// * `benchmark` - Market reference for the relative metrics
    pub fn new(
        profile: RiskProfile,
        capital: f64,
        raw_weights: &[f64],
        period_returns_pct: &[f64],
        benchmark: BenchmarkContext,
    ) -> Result<Self> {
        let pool_size = profile.instruments().len();
        if raw_weights.len() != pool_size || period_returns_pct.len() != pool_size {
            return Err(Error::InvalidInput(format!(
                "{profile} model portfolio needs {pool_size} weights and returns, got {} and {}",
                raw_weights.len(),
                period_returns_pct.len()
            )));
        }

        let weights_pct = normalize_weights(raw_weights)?;
        tracing::debug!(%profile, capital, ?weights_pct, "built model portfolio");

        Ok(Self {
            profile,
            capital,
            weights_pct,
            period_returns_pct: period_returns_pct.to_vec(),
            benchmark,
            volatility: None,
        })
    }

    /// Attach a volatility estimate for the Sharpe ratio.
    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = Some(volatility);
        self
    }

    pub fn profile(&self) -> RiskProfile {
        self.profile
    }

    /// Normalised weights in instrument order.
    pub fn weights_pct(&self) -> &[f64] {
        &self.weights_pct
    }
}

impl PortfolioSource for ModelPortfolio {
    fn portfolio(&self) -> Result<Portfolio> {
        let holdings = self
            .profile
            .instruments()
            .iter()
            .zip(&self.weights_pct)
            .zip(&self.period_returns_pct)
            .map(|((symbol, weight), ret)| {
                let price = unit_price(symbol).ok_or_else(|| {
                    Error::InvalidInput(format!("no reference price for {symbol}"))
                })?;
                Ok(Holding::new(symbol, *weight, price, *ret))
            })
            .collect::<Result<Vec<_>>>()?;

        Portfolio::new(self.capital, holdings)
    }

    fn benchmark(&self) -> Result<BenchmarkContext> {
        self.benchmark.validate()?;
        Ok(self.benchmark)
    }

    fn volatility(&self) -> Option<f64> {
        self.volatility
    }
}
