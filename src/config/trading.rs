use super::traits::{invalid, ConfigSection};
use crate::error::NeurotradeError;
use chrono::Weekday;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingConfig {
    /// Reset baseline and withdrawal floor
    pub initial_capital: f64,
    /// Charged once per opened leg
    pub commission: f64,
    pub reward_rate: f64,
    /// Days of history fed to the network
    pub lookback: usize,
    pub trading_days: Vec<Weekday>,
    pub symbols: Vec<String>,
    pub features: FeatureNames,
}

/// Names of the universe columns the simulator reads directly
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureNames {
    pub day: String,
    pub month: String,
    pub close_suffix: String,
    pub expected_move_suffix: String,
}

impl Default for FeatureNames {
    fn default() -> Self {
        Self {
            day: "Day".to_string(),
            month: "Month".to_string(),
            close_suffix: "_ClosePrice".to_string(),
            expected_move_suffix: "_StandardDeviation".to_string(),
        }
    }
}

impl FeatureNames {
    pub fn close(&self, symbol: &str) -> String {
        format!("{}{}", symbol, self.close_suffix)
    }

    pub fn expected_move(&self, symbol: &str) -> String {
        format!("{}{}", symbol, self.expected_move_suffix)
    }
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            initial_capital: 1000.0,
            commission: 1.74,
            reward_rate: 0.06,
            lookback: 5,
            trading_days: vec![Weekday::Mon, Weekday::Wed, Weekday::Fri],
            symbols: vec!["SPY".to_string()],
            features: FeatureNames::default(),
        }
    }
}

impl ConfigSection for TradingConfig {
    fn section_name() -> &'static str {
        "trading"
    }

    fn validate(&self) -> Result<(), NeurotradeError> {
        let section = Self::section_name();
        if self.initial_capital <= 0.0 {
            return Err(invalid(section, "initial_capital must be positive"));
        }
        if self.commission < 0.0 {
            return Err(invalid(section, "commission cannot be negative"));
        }
        if self.reward_rate < 0.0 {
            return Err(invalid(section, "reward_rate cannot be negative"));
        }
        if self.lookback == 0 {
            return Err(invalid(section, "lookback must be at least 1 day"));
        }
        if self.trading_days.is_empty() {
            return Err(invalid(section, "at least one trading day is required"));
        }
        if self.symbols.is_empty() {
            return Err(invalid(section, "at least one symbol is required"));
        }
        Ok(())
    }
}
