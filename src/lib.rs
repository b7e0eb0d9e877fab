pub mod config;
pub mod document;
pub mod errors;
pub mod graph;
pub mod report;
pub mod resolution;
pub mod types;
