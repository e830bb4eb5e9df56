use super::traits::{invalid, ConfigSection};
use crate::error::NeurotradeError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub hidden_layers: Vec<usize>,
    /// Two per instrument: long fraction then short fraction
    pub output_count: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            hidden_layers: vec![16, 8],
            output_count: 2,
        }
    }
}

impl NetworkConfig {
    pub fn layers(&self) -> Vec<usize> {
        let mut layers = self.hidden_layers.clone();
        layers.push(self.output_count);
        layers
    }
}

impl ConfigSection for NetworkConfig {
    fn section_name() -> &'static str {
        "network"
    }

    fn validate(&self) -> Result<(), NeurotradeError> {
        if self.hidden_layers.iter().any(|&size| size == 0) {
            return Err(invalid(Self::section_name(), "hidden layers cannot be empty"));
        }
        if self.output_count == 0 {
            return Err(invalid(Self::section_name(), "output_count must be positive"));
        }
        Ok(())
    }
}
