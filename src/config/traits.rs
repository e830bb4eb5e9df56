use crate::error::NeurotradeError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), NeurotradeError>;
}

pub(crate) fn invalid(section: &str, message: impl std::fmt::Display) -> NeurotradeError {
    NeurotradeError::Configuration(format!("[{}] {}", section, message))
}
