//! Field Lingo
//!
//! Adds per-language columns next to the localized column families of a
//! database schema. See `field-lingo --help`.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    lingo_cli::main_entry().await
}
