//! Adapter implementations
//!
//! Adapters implement the storage port with concrete technologies:
//! - In-memory map (tests, throwaway sessions)
//! - JSON files in the data directory (default)
//! - DuckDB single-file database

pub mod duckdb;
pub mod json_file;
pub mod memory;

pub use self::duckdb::DuckDbStore;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
