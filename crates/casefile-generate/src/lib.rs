//! Seeded generation of the Aurora Theater case file.
//!
//! Four generators (police records, witness reports, stage access log, staff
//! roster) each emit their scripted fixture rows followed by random filler.
//! [`GenerationEngine`] threads ids between them and writes one CSV per table.

pub mod engine;
pub mod errors;
pub mod faker;
pub mod generators;
pub mod model;
pub mod output;

pub use engine::{BuiltTables, GenerationEngine, GenerationResult, REPORT_FILE, table_path};
pub use errors::GenerationError;
pub use model::{GenerateOptions, GenerationReport, TableReport};
