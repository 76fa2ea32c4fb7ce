//! Verification of generated case files.
//!
//! Reads the four CSV tables back from disk, recovers the murderer and the
//! victim from the scripted badge movements, and checks every invariant the
//! puzzle relies on.

pub mod engine;
pub mod errors;
pub mod model;

pub use engine::{REPORT_FILE, VerificationEngine};
pub use errors::EvalError;
pub use model::{TableCount, VerificationReport, VerifyOptions};
