use ecoassess_interchange::InterchangeError;

/// Errors returned by workflow engine operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// No step with this ID exists in the workflow.
    #[error("step not found: {step_id} (workflow {workflow_id})")]
    StepNotFound {
        workflow_id: String,
        step_id: String,
    },

    /// Two steps share the same ID.
    #[error("duplicate step id: {step_id}")]
    DuplicateStep { step_id: String },

    /// A step depends on an ID that no step in the workflow carries.
    #[error("step {step_id} depends on unknown step {dependency}")]
    DanglingDependency { step_id: String, dependency: String },

    /// A step lists itself as a dependency.
    #[error("step {step_id} depends on itself")]
    SelfDependency { step_id: String },

    /// The dependency graph is not acyclic.
    #[error("dependency graph is not acyclic: cycle detected involving steps [{}]", steps.join(", "))]
    CyclicDependencies { steps: Vec<String> },

    /// The workflow JSON could not be converted into typed structs.
    #[error(transparent)]
    Interchange(#[from] InterchangeError),
}
