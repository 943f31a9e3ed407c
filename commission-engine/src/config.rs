use serde::Deserialize;
use std::env;

/// Currency and precision settings for commission calculation
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Decimal places of the currency minor unit (2 for kobo/cents)
    #[serde(default = "default_minor_unit_scale")]
    pub minor_unit_scale: u32,
    /// Display precision of derived effective rates
    #[serde(default = "default_effective_rate_scale")]
    pub effective_rate_scale: u32,
}

fn default_currency() -> String { "NGN".to_string() }

fn default_minor_unit_scale() -> u32 { 2 }

fn default_effective_rate_scale() -> u32 { 4 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            minor_unit_scale: default_minor_unit_scale(),
            effective_rate_scale: default_effective_rate_scale(),
        }
    }
}

impl EngineConfig {
    /// Layered load: config/default, config/{RUN_MODE}, config/local, then
    /// `COMMISSION__*` environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("COMMISSION").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn from_toml_str(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
