//! Core contracts for the Aurora Theater case file.
//!
//! This crate defines the record types written to the four dataset tables,
//! the scripted scenario that encodes the puzzle solution, and validation
//! helpers shared by the generator, the verifier and the CLI.

pub mod error;
pub mod records;
pub mod scenario;
pub mod types;
pub mod validation;

pub use error::{Error, Result};
pub use records::{
    AccessEvent, Dataset, Incident, Principal, Solution, StaffMember, StaffPool, StaffRecord,
    Testimony, distinct_member_ids,
};
pub use scenario::{
    CASE_ID, SCRIPTED_TESTIMONIES, TIMELINE, TimelineEntry, canonical_date, canonical_incident,
    time_of_death, timeline_for, timeline_matches,
};
pub use types::{
    Category, Direction, IncidentLocation, IncidentType, Involvement, Squad, StaffRole,
    TheaterArea,
};
pub use validation::{check_dataset, validate_dataset};

/// Timestamp layout used by the stage access table.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date layout used by the police records table.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
