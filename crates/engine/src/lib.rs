//! ecoassess workflow engine -- sequences the steps of a site assessment.
//!
//! A workflow is a dependency graph of steps grouped into three phases
//! (desk research, field research, reporting). The engine builds the
//! canonical graph, answers which steps are ready or blocked, computes
//! completion percentages, and applies status changes by returning new
//! snapshots. It performs no I/O; the only ambient inputs are the
//! [`Clock`] passed to mutating calls and the random workflow ID.

pub mod aggregate;
pub mod error;
pub mod factory;
pub mod integrity;
pub mod mutate;
pub mod progress;
pub mod resolver;

pub use aggregate::{derived_phase, derived_status};
pub use ecoassess_interchange::{Clock, FixedClock, SteppingClock, SystemClock};
pub use error::EngineError;
pub use factory::{create_standard_assessment_workflow, standard_steps, AssessmentSpec};
pub use integrity::{check_integrity, ingest};
pub use mutate::{
    assign_step, record_outputs, record_validation, refresh_aggregates, update_step_status,
};
pub use progress::{phase_breakdown, phase_progress, workflow_progress, PhaseProgress};
pub use resolver::{blocked_steps, blockers, is_ready, next_steps};
