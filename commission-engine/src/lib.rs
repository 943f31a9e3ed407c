pub mod calculator;
pub mod config;
pub mod resolver;

pub use calculator::{CalculationError, RateCalculator, RateOutcome};
pub use crate::config::EngineConfig;
pub use resolver::{eligible_rules, Resolution, ResolutionError, RuleResolver};
