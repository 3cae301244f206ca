//! Capital allocation and mark-to-market valuation.

use crate::types::{Portfolio, Valuation};
use crate::{Error, Result};

/// Size and value every holding of a portfolio.
///
/// The portfolio invariants are checked again before any arithmetic so a
/// hand-assembled or stale snapshot cannot yield infinite unit counts.
/// Values are returned in holding order and are never rounded.
pub fn allocate(portfolio: &Portfolio) -> Result<Vec<Valuation>> {
    portfolio.validate()?;

    Ok(portfolio
        .holdings()
        .iter()
        .map(|holding| Valuation {
            holding: holding.clone(),
            invested_amount: portfolio.invested_amount(holding),
            units: portfolio.units(holding),
            current_value: portfolio.current_value(holding),
        })
        .collect())
}

/// Scale positive raw weights so they sum to 100.
///
/// # Arguments
///
/// * `raw` - Relative allocation weights in any unit (e.g. 20, 25, 30, 25)
///
/// # Returns
///
/// Percent weights in the same order, or an error on empty input or a
/// non-positive weight.
pub fn normalize_weights(raw: &[f64]) -> Result<Vec<f64>> {
    if raw.is_empty() {
        return Err(Error::InvalidInput("no weights to normalize".to_string()));
    }
    if let Some(bad) = raw.iter().find(|w| !(w.is_finite() && **w > 0.0)) {
        return Err(Error::InvalidInput(format!(
            "raw weights must be positive, got {bad}"
        )));
    }

    let total: f64 = raw.iter().sum();
    Ok(raw.iter().map(|w| w * 100.0 / total).collect())
}
