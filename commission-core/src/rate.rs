use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RateSpecError;

/// A contiguous order amount range carrying its own flat rate.
/// Both ends are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBand {
    pub min: Decimal,
    pub max: Decimal,
    /// Percentage applied to the full order amount
    pub rate: Decimal,
}

impl TierBand {
    pub fn new(min: Decimal, max: Decimal, rate: Decimal) -> Self {
        Self { min, max, rate }
    }

    pub fn contains(&self, amount: Decimal) -> bool {
        self.min <= amount && amount <= self.max
    }
}

/// How a rule prices its commission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RateSpec {
    /// Percentage of the order amount (5.0 means 5%)
    Percentage { rate: Decimal },
    /// Flat amount regardless of order size
    Fixed { amount: Decimal },
    /// Single band rate chosen by where the order amount falls
    Tiered { bands: Vec<TierBand> },
}

impl RateSpec {
    pub fn percentage(rate: Decimal) -> Self {
        RateSpec::Percentage { rate }
    }

    pub fn fixed(amount: Decimal) -> Self {
        RateSpec::Fixed { amount }
    }

    pub fn tiered(bands: Vec<TierBand>) -> Self {
        RateSpec::Tiered { bands }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RateSpec::Percentage { .. } => "percentage",
            RateSpec::Fixed { .. } => "fixed",
            RateSpec::Tiered { .. } => "tiered",
        }
    }

    /// Structural validation shared by rule authoring and calculation
    pub fn validate(&self) -> Result<(), RateSpecError> {
        match self {
            RateSpec::Percentage { rate } => {
                if *rate < Decimal::ZERO {
                    return Err(RateSpecError::NegativeRate(*rate));
                }
                Ok(())
            }
            RateSpec::Fixed { amount } => {
                if *amount < Decimal::ZERO {
                    return Err(RateSpecError::NegativeFixedAmount(*amount));
                }
                Ok(())
            }
            RateSpec::Tiered { bands } => validate_bands(bands),
        }
    }
}

/// Bands must be non-empty, well-formed, ascending and non-overlapping.
/// Adjacent bands may share a boundary value only when both have non-zero width.
pub fn validate_bands(bands: &[TierBand]) -> Result<(), RateSpecError> {
    if bands.is_empty() {
        return Err(RateSpecError::EmptyBands);
    }

    for (index, band) in bands.iter().enumerate() {
        if band.min > band.max {
            return Err(RateSpecError::MalformedBand {
                index,
                reason: format!("min {} exceeds max {}", band.min, band.max),
            });
        }
        if band.min < Decimal::ZERO {
            return Err(RateSpecError::MalformedBand {
                index,
                reason: format!("min {} is negative", band.min),
            });
        }
        if band.rate < Decimal::ZERO {
            return Err(RateSpecError::MalformedBand {
                index,
                reason: format!("rate {} is negative", band.rate),
            });
        }
    }

    for (index, pair) in bands.windows(2).enumerate() {
        let (previous, next) = (&pair[0], &pair[1]);
        let shares_boundary = next.min == previous.max;
        let zero_width = previous.min == previous.max || next.min == next.max;
        if next.min < previous.max || (shares_boundary && zero_width) {
            return Err(RateSpecError::UnorderedBands {
                previous: index,
                index: index + 1,
            });
        }
    }

    Ok(())
}
