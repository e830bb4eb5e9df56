pub mod csv;
pub mod store;
pub mod universe;

pub use csv::CsvConnector;
pub use store::CandidateStore;
pub use universe::Universe;
