//! ecoassess-interchange: Shared assessment workflow types and JSON interchange.
//!
//! Provides typed structs for the persisted workflow shape
//! (`AssessmentWorkflow`, `WorkflowStep`), the quality-check result
//! exchanged between the validator and the engine, and a single
//! `from_json()` entry point that turns a `serde_json::Value` held by
//! the host application into an `AssessmentWorkflow`.
//!
//! The engine, the quality validator and the CLI all depend on this
//! crate so that every consumer reads and writes the same shape and
//! stamps time through the same [`Clock`].

pub mod clock;
pub mod deserialize;
pub mod types;

pub use clock::{format_timestamp, Clock, FixedClock, SteppingClock, SystemClock};
pub use deserialize::{from_json, to_json, InterchangeError};
pub use types::*;
