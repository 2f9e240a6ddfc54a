//! # Lingo IR (Schema Model)
//!
//! This crate provides the in-memory schema model the generators work on:
//! tables with their columns in declaration order, schema snapshots and
//! static language lists.
//!
//! ## Core Concepts
//!
//! - **Column**: name, declared type and nullability of a column
//! - **Table**: a named, ordered list of columns
//! - **Schema**: the tables of a database, implementing [`SchemaProvider`]
//! - **LanguageList**: a [`LanguageRegistry`](lingo_core::LanguageRegistry)
//!   backed by configuration
//!

// Module declarations
pub mod column;
pub mod languages;
pub mod schema;
pub mod serialization;
pub mod table;

// Re-export commonly used types at crate root
pub use column::Column;
pub use languages::LanguageList;
pub use schema::{Schema, SchemaProvider};
pub use serialization::{
    SchemaFile, load_schema, load_schema_from_string, save_schema, save_schema_to_string,
};
pub use table::Table;

// Re-export core types that are commonly used with the schema model
pub use lingo_core::{EngineError, EngineResult, Language, Validatable};

/// Current version of schema snapshot files
pub const SCHEMA_VERSION: u32 = 1;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Tests
// ============================================================================
