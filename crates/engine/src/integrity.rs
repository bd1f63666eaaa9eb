//! Dependency graph integrity checks for caller-supplied workflows.
//!
//! The resolver assumes every dependency names a step in the same
//! workflow and that the graph is acyclic. A cyclic graph would leave the
//! steps on the cycle blocked forever without any diagnostic, so stored or
//! hand-built workflows are checked here before they are used.

use std::collections::{BTreeMap, HashSet, VecDeque};

use ecoassess_interchange::{from_json, AssessmentWorkflow};
use tracing::debug;

use crate::error::EngineError;

/// Verify step IDs are unique, every dependency resolves, no step depends
/// on itself, and the dependency graph is acyclic.
pub fn check_integrity(workflow: &AssessmentWorkflow) -> Result<(), EngineError> {
    let result = check_graph(workflow);
    if let Err(ref e) = result {
        debug!(workflow_id = %workflow.id, error = %e, "workflow failed integrity check");
    }
    result
}

fn check_graph(workflow: &AssessmentWorkflow) -> Result<(), EngineError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for step in &workflow.steps {
        if !seen.insert(step.id.as_str()) {
            return Err(EngineError::DuplicateStep {
                step_id: step.id.clone(),
            });
        }
    }

    for step in &workflow.steps {
        for dep in &step.dependencies {
            if !seen.contains(dep.as_str()) {
                return Err(EngineError::DanglingDependency {
                    step_id: step.id.clone(),
                    dependency: dep.clone(),
                });
            }
            if *dep == step.id {
                return Err(EngineError::SelfDependency {
                    step_id: step.id.clone(),
                });
            }
        }
    }

    detect_dependency_cycle(workflow)
}

/// Kahn's algorithm over dependency edges. Steps left unprocessed sit on
/// a cycle or downstream of one.
fn detect_dependency_cycle(workflow: &AssessmentWorkflow) -> Result<(), EngineError> {
    let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    let mut pending: BTreeMap<&str, usize> = BTreeMap::new();

    for step in &workflow.steps {
        let unique: HashSet<&str> = step.dependencies.iter().map(String::as_str).collect();
        pending.insert(step.id.as_str(), unique.len());
        for dep in unique {
            dependents.entry(dep).or_default().push(step.id.as_str());
        }
    }

    let mut queue: VecDeque<&str> = pending
        .iter()
        .filter(|(_, &n)| n == 0)
        .map(|(&id, _)| id)
        .collect();
    let mut processed: HashSet<&str> = HashSet::new();

    while let Some(node) = queue.pop_front() {
        processed.insert(node);
        for &dependent in dependents.get(node).map(Vec::as_slice).unwrap_or(&[]) {
            if let Some(count) = pending.get_mut(dependent) {
                *count -= 1;
                if *count == 0 {
                    queue.push_back(dependent);
                }
            }
        }
    }

    if processed.len() < pending.len() {
        let mut cyclic: Vec<String> = pending
            .keys()
            .filter(|id| !processed.contains(*id))
            .map(|id| id.to_string())
            .collect();
        cyclic.sort_unstable();
        return Err(EngineError::CyclicDependencies { steps: cyclic });
    }

    Ok(())
}

/// Parse a persisted workflow and check its dependency graph.
pub fn ingest(value: &serde_json::Value) -> Result<AssessmentWorkflow, EngineError> {
    let workflow = from_json(value)?;
    check_integrity(&workflow)?;
    Ok(workflow)
}
