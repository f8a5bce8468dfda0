//! Planned actions and apply results

use crate::diagnostics::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A planned change to one resource instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// `<type>.<name>`
    pub address: String,

    pub action_type: ActionType,

    /// Resource type (e.g., "n8n_workflow")
    pub resource_type: String,

    /// Attributes whose value differs from state
    pub changes: Vec<String>,

    /// Desired attributes; `None` for deletes
    pub planned: Option<Value>,

    /// Stored attributes; `None` for creates
    pub prior: Option<Value>,
}

impl Action {
    pub fn description(&self) -> String {
        match self.action_type {
            ActionType::Create => format!("{} will be created", self.address),
            ActionType::Update => format!(
                "{} will be updated in-place ({})",
                self.address,
                self.changes.join(", ")
            ),
            ActionType::Replace => format!(
                "{} must be replaced ({})",
                self.address,
                self.changes.join(", ")
            ),
            ActionType::Delete => format!("{} will be destroyed", self.address),
            ActionType::NoOp => format!("{} is up to date", self.address),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Create,
    /// Change attributes of the existing entity
    Update,
    /// Delete then create, for attributes that cannot change in place
    Replace,
    Delete,
    NoOp,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Update => write!(f, "update"),
            ActionType::Replace => write!(f, "replace"),
            ActionType::Delete => write!(f, "delete"),
            ActionType::NoOp => write!(f, "no-op"),
        }
    }
}

/// Result of applying a plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyResult {
    pub succeeded: Vec<ActionResult>,
    pub failed: Vec<ActionResult>,
    /// Warnings raised by successful actions
    pub diagnostics: Vec<AddressedDiagnostic>,
    pub duration_ms: u64,
}

impl ApplyResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn add_success(&mut self, address: &str, action_type: ActionType, message: String) {
        self.succeeded.push(ActionResult {
            address: address.to_string(),
            action_type,
            message,
            error: None,
        });
    }

    pub fn add_failure(&mut self, address: &str, action_type: ActionType, error: String) {
        self.failed.push(ActionResult {
            address: address.to_string(),
            action_type,
            message: String::new(),
            error: Some(error),
        });
    }

    pub fn add_diagnostics(&mut self, address: &str, diagnostics: Vec<Diagnostic>) {
        self.diagnostics
            .extend(diagnostics.into_iter().map(|diagnostic| AddressedDiagnostic {
                address: address.to_string(),
                diagnostic,
            }));
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub address: String,
    pub action_type: ActionType,
    pub message: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressedDiagnostic {
    pub address: String,
    pub diagnostic: Diagnostic,
}

/// Plan containing all actions to be applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
    pub actions: Vec<Action>,
    pub has_changes: bool,
}

impl Plan {
    pub fn new(actions: Vec<Action>) -> Self {
        let has_changes = actions.iter().any(|a| a.action_type != ActionType::NoOp);
        Self {
            actions,
            has_changes,
        }
    }

    pub fn actions_by_type(&self, action_type: ActionType) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|a| a.action_type == action_type)
            .collect()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            create: self.actions_by_type(ActionType::Create).len(),
            update: self.actions_by_type(ActionType::Update).len(),
            replace: self.actions_by_type(ActionType::Replace).len(),
            delete: self.actions_by_type(ActionType::Delete).len(),
            no_change: self.actions_by_type(ActionType::NoOp).len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSummary {
    pub create: usize,
    pub update: usize,
    pub replace: usize,
    pub delete: usize,
    pub no_change: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to create, {} to update, {} to replace, {} to delete, {} unchanged",
            self.create, self.update, self.replace, self.delete, self.no_change
        )
    }
}
