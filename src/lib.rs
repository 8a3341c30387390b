pub mod analyzers;
pub mod assistant;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod output;
pub mod prompt;
pub mod router;
pub mod session;
