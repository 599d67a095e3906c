//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB file for the KeyValueStore port
//! - In-process map for the KeyValueStore port (tests, throwaway sessions)
//! - Built-in and JSON-file product catalogs

pub mod catalog;
pub mod duckdb;
pub mod memory;

#[cfg(test)]
pub mod failing;
