use commission_core::{RateSpec, RateSpecError, TierBand};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Result of pricing one order against one rate spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateOutcome {
    /// Percentage actually applied; for fixed rates a display-only derivation
    pub effective_rate: Decimal,
    /// Rounded half-up to the currency minor unit
    pub commission_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalculationError {
    #[error("Invalid rate: {0}")]
    InvalidRate(RateSpecError),

    #[error("Invalid tier bands: {0}")]
    InvalidBands(RateSpecError),

    #[error("No tier band covers order amount {amount}")]
    NoMatchingBand { amount: Decimal },

    #[error("Order amount must not be negative: {0}")]
    InvalidAmount(Decimal),

    #[error("Commission arithmetic overflowed for amount {0}")]
    Overflow(Decimal),
}

impl From<RateSpecError> for CalculationError {
    fn from(err: RateSpecError) -> Self {
        if err.is_band_error() {
            CalculationError::InvalidBands(err)
        } else {
            CalculationError::InvalidRate(err)
        }
    }
}

/// Pure rate calculation. Holds only rounding precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateCalculator {
    minor_unit_scale: u32,
    effective_rate_scale: u32,
}

impl Default for RateCalculator {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl RateCalculator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            minor_unit_scale: config.minor_unit_scale,
            effective_rate_scale: config.effective_rate_scale,
        }
    }

    pub fn compute(&self, spec: &RateSpec, amount: Decimal) -> Result<RateOutcome, CalculationError> {
        if amount < Decimal::ZERO {
            return Err(CalculationError::InvalidAmount(amount));
        }
        spec.validate()?;

        match spec {
            RateSpec::Percentage { rate } => Ok(RateOutcome {
                effective_rate: *rate,
                commission_amount: self.percentage_of(amount, *rate)?,
            }),
            RateSpec::Fixed { amount: fixed } => {
                let effective_rate = if amount.is_zero() {
                    Decimal::ZERO
                } else {
                    let ratio = fixed
                        .checked_div(amount)
                        .and_then(|ratio| ratio.checked_mul(HUNDRED))
                        .ok_or(CalculationError::Overflow(amount))?;
                    round_half_up(ratio, self.effective_rate_scale)
                };
                Ok(RateOutcome {
                    effective_rate,
                    commission_amount: round_half_up(*fixed, self.minor_unit_scale),
                })
            }
            RateSpec::Tiered { bands } => {
                let band = select_band(bands, amount)
                    .ok_or(CalculationError::NoMatchingBand { amount })?;
                Ok(RateOutcome {
                    effective_rate: band.rate,
                    commission_amount: self.percentage_of(amount, band.rate)?,
                })
            }
        }
    }

    /// Rounding happens once, after the full product is formed
    fn percentage_of(&self, amount: Decimal, rate: Decimal) -> Result<Decimal, CalculationError> {
        let raw = amount
            .checked_mul(rate)
            .and_then(|product| product.checked_div(HUNDRED))
            .ok_or(CalculationError::Overflow(amount))?;
        Ok(round_half_up(raw, self.minor_unit_scale))
    }
}

/// First band containing the amount; on a shared boundary the lower band wins
fn select_band(bands: &[TierBand], amount: Decimal) -> Option<&TierBand> {
    bands.iter().find(|band| band.contains(amount))
}

fn round_half_up(value: Decimal, scale: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    rounded
}
