//! Typed structs representing the persisted assessment workflow shape.
//!
//! Field names serialize in camelCase and enum values in snake_case so
//! the JSON matches what the host application already stores. Timestamps
//! are RFC 3339 strings; the engine produces them, consumers treat them
//! as opaque.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Template identifier of the canonical 16-step assessment workflow.
pub const STANDARD_TEMPLATE_ID: &str = "standard-assessment";

// ── Phase ───────────────────────────────────────────────────────────

/// One of the three sequential groupings a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    DeskResearch,
    FieldResearch,
    Reporting,
}

impl Phase {
    /// All phases in execution order.
    pub const ALL: [Phase; 3] = [Phase::DeskResearch, Phase::FieldResearch, Phase::Reporting];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::DeskResearch => "desk_research",
            Phase::FieldResearch => "field_research",
            Phase::Reporting => "reporting",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::DeskResearch => "Desk Research",
            Phase::FieldResearch => "Field Research",
            Phase::Reporting => "Reporting",
        }
    }

    /// Icon key used by display layers.
    pub fn icon(&self) -> &'static str {
        match self {
            Phase::DeskResearch => "book-open",
            Phase::FieldResearch => "map-pin",
            Phase::Reporting => "file-text",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desk_research" => Ok(Phase::DeskResearch),
            "field_research" => Ok(Phase::FieldResearch),
            "reporting" => Ok(Phase::Reporting),
            other => Err(format!(
                "unknown phase '{}', expected one of: desk_research, field_research, reporting",
                other
            )),
        }
    }
}

// ── Step status ─────────────────────────────────────────────────────

/// Status of a single workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    NotStarted,
    InProgress,
    Completed,
    NeedsReview,
    Blocked,
}

impl StepStatus {
    pub const ALL: [StepStatus; 5] = [
        StepStatus::NotStarted,
        StepStatus::InProgress,
        StepStatus::Completed,
        StepStatus::NeedsReview,
        StepStatus::Blocked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::NotStarted => "not_started",
            StepStatus::InProgress => "in_progress",
            StepStatus::Completed => "completed",
            StepStatus::NeedsReview => "needs_review",
            StepStatus::Blocked => "blocked",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StepStatus::NotStarted => "Not Started",
            StepStatus::InProgress => "In Progress",
            StepStatus::Completed => "Completed",
            StepStatus::NeedsReview => "Needs Review",
            StepStatus::Blocked => "Blocked",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            StepStatus::NotStarted => "circle",
            StepStatus::InProgress => "clock",
            StepStatus::Completed => "check-circle",
            StepStatus::NeedsReview => "alert-circle",
            StepStatus::Blocked => "lock",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, StepStatus::Completed)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepStatus::ALL
            .iter()
            .find(|status| status.as_str() == s)
            .copied()
            .ok_or_else(|| {
                format!(
                    "unknown step status '{}', expected one of: not_started, in_progress, completed, needs_review, blocked",
                    s
                )
            })
    }
}

// ── Workflow status ─────────────────────────────────────────────────

/// Coarse aggregate status of a whole workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::NotStarted => "not_started",
            WorkflowStatus::InProgress => "in_progress",
            WorkflowStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkflowStatus::NotStarted => "Not Started",
            WorkflowStatus::InProgress => "In Progress",
            WorkflowStatus::Completed => "Completed",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            WorkflowStatus::NotStarted => "circle",
            WorkflowStatus::InProgress => "activity",
            WorkflowStatus::Completed => "check-circle",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Step ────────────────────────────────────────────────────────────

/// A single unit of work inside an assessment workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub phase: Phase,
    pub status: StepStatus,
    /// IDs of steps that must each be completed before this one is eligible.
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    /// Artifact IDs produced by this step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<String>>,
}

impl WorkflowStep {
    /// A fresh `not_started` step with no optional fields set.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        phase: Phase,
        dependencies: &[&str],
    ) -> Self {
        WorkflowStep {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            phase,
            status: StepStatus::NotStarted,
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            assigned_to: None,
            started_at: None,
            completed_at: None,
            outputs: None,
            validation_errors: None,
        }
    }
}

// ── Workflow ────────────────────────────────────────────────────────

/// One site assessment's complete workflow snapshot.
///
/// `status` and `current_phase` are stored labels maintained by the
/// caller; the engine offers derived equivalents computed from steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentWorkflow {
    pub id: String,
    pub assessment_id: String,
    pub site_code: String,
    pub site_name: String,
    pub template_id: String,
    pub status: WorkflowStatus,
    pub current_phase: Phase,
    pub steps: Vec<WorkflowStep>,
    pub assigned_to: String,
    pub assigned_by: String,
    pub due_date: String,
    pub created_at: String,
    pub updated_at: String,
}

impl AssessmentWorkflow {
    pub fn step(&self, step_id: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn steps_in_phase(&self, phase: Phase) -> impl Iterator<Item = &WorkflowStep> {
        self.steps.iter().filter(move |s| s.phase == phase)
    }
}

// ── Quality check ───────────────────────────────────────────────────

/// Outcome of checking one record against a rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityCheckResult {
    pub passed: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub timestamp: String,
    pub checked_by: String,
}
