pub mod evolution;
pub mod manager;
pub mod network;
pub mod trading;
pub mod traits;

pub use evolution::EvolutionConfig;
pub use manager::{AppConfig, ConfigManager};
pub use network::NetworkConfig;
pub use trading::{FeatureNames, TradingConfig};
pub use traits::ConfigSection;
