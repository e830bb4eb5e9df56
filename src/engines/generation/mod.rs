pub mod evolution_engine;
pub mod genome;
pub mod hall_of_fame;
pub mod operators;
pub mod progress;

pub use evolution_engine::{
    bucket_reseat, EvolutionEngine, EvolutionOutcome, GenerationSummary, ProgressCallback,
};
pub use genome::{Genome, Topology};
pub use hall_of_fame::{EliteCandidate, HallOfFame};
pub use progress::LogProgressCallback;
