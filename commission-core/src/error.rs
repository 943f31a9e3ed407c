use rust_decimal::Decimal;

/// Structural problems with a rate specification
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateSpecError {
    #[error("Rate must not be negative: {0}")]
    NegativeRate(Decimal),

    #[error("Fixed amount must not be negative: {0}")]
    NegativeFixedAmount(Decimal),

    #[error("Tiered rate has no bands")]
    EmptyBands,

    #[error("Band {index} is malformed: {reason}")]
    MalformedBand { index: usize, reason: String },

    #[error("Band {index} overlaps or precedes band {previous}")]
    UnorderedBands { previous: usize, index: usize },
}

impl RateSpecError {
    /// True for errors that concern the band list rather than a single rate value
    pub fn is_band_error(&self) -> bool {
        matches!(
            self,
            RateSpecError::EmptyBands
                | RateSpecError::MalformedBand { .. }
                | RateSpecError::UnorderedBands { .. }
        )
    }
}

/// Authoring-time rule validation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleValidationError {
    #[error("Rule name must not be empty")]
    EmptyName,

    #[error("{0} rule must target at least one id")]
    EmptyScopeTargets(&'static str),

    #[error("Invalid order value bounds: {0}")]
    InvalidBounds(String),

    #[error(transparent)]
    Rate(#[from] RateSpecError),
}
