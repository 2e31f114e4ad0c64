// data/mod.rs
pub mod source;
pub mod types;

// Re-export main interfaces
pub use source::{read_json_file, InMemorySource, JsonFileSource, MarketDataSource};
pub use types::*;
