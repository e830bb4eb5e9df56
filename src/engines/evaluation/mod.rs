pub mod allocation;
pub mod candidate;
pub mod network;
pub mod simulator;

pub use allocation::allocate_risk;
pub use candidate::{Candidate, CandidateSnapshot};
pub use simulator::TradingSimulator;
