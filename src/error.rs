use thiserror::Error;

#[derive(Error, Debug)]
pub enum NeurotradeError {
    #[error("Malformed genome: {0}")]
    MalformedGenome(String),

    #[error("Topology mismatch: {0}")]
    TopologyMismatch(String),

    #[error("Genome has no nodes")]
    EmptyGenome,

    #[error("Universe has {days} days, lookback of {lookback} leaves no day to trade")]
    InsufficientUniverse { days: usize, lookback: usize },

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, NeurotradeError>;
