//! # Lingo Core
//!
//! Core types, traits, and error handling for Field Lingo.
//!
//! This crate provides the foundational building blocks used throughout
//! the workspace, including:
//!
//! - **Types**: Database dialects, position policies, apply modes, languages
//! - **Traits**: `Validatable`, `Persistable` and the collaborator contracts
//!   (`LanguageRegistry`, `SessionStore`, `StatementExecutor`, `Clock`)
//! - **Errors**: Unified error handling with `EngineError` and `EngineResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{EngineError, EngineResult};
pub use traits::{
    Clock, FixedClock, LanguageRegistry, Persistable, SessionStore, StatementExecutor,
    SystemClock, Validatable,
};
pub use types::{ApplyMode, DatabaseType, Language, PositionPolicy};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
