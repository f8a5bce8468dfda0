//! `n8n_workflow_activation` resource
//!
//! Drives the active flag of an existing workflow. The resource id is the
//! workflow id, so one workflow has at most one activation resource.

use crate::diagnostics::Diagnostic;
use crate::error::{ProviderError, Result};
use crate::resource::{Outcome, Resource};
use crate::schema::{Attribute, AttributeType, Schema};
use async_trait::async_trait;
use n8nform_client::{Client, ClientError, Workflow};
use serde::{Deserialize, Serialize};

pub const TYPE_NAME: &str = "n8n_workflow_activation";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowActivationModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub workflow_id: String,
    #[serde(default)]
    pub active: bool,
}

pub struct WorkflowActivationResource {
    client: Client,
}

impl WorkflowActivationResource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch(&self, workflow_id: &str) -> std::result::Result<Workflow, ClientError> {
        self.client.get_workflow(workflow_id).await
    }

    /// Issue the single call that moves the workflow to `active`
    async fn transition(&self, workflow_id: &str, active: bool) -> Result<()> {
        if active {
            self.client
                .activate_workflow(workflow_id)
                .await
                .map_err(|e| {
                    ProviderError::remote("Error Activating Workflow", "Could not activate workflow", e)
                })?;
            tracing::info!("Workflow {} activated", workflow_id);
        } else {
            self.client
                .deactivate_workflow(workflow_id)
                .await
                .map_err(|e| {
                    ProviderError::remote(
                        "Error Deactivating Workflow",
                        "Could not deactivate workflow",
                        e,
                    )
                })?;
            tracing::info!("Workflow {} deactivated", workflow_id);
        }
        Ok(())
    }
}

fn read_error(workflow_id: &str, err: ClientError) -> ProviderError {
    ProviderError::remote(
        "Error Reading Workflow",
        format!("Could not read workflow ID {}", workflow_id),
        err,
    )
}

pub fn schema() -> Schema {
    Schema::new(
        "Manages the activation state of an n8n workflow. Workflows must have at least one \
         trigger node to be activated.",
    )
    .with_attribute(
        "id",
        Attribute::computed(AttributeType::String, "Internal identifier (same as workflow_id)"),
    )
    .with_attribute(
        "workflow_id",
        Attribute::required(
            AttributeType::String,
            "The ID of the workflow to manage activation for",
        )
        .requires_replace(),
    )
    .with_attribute(
        "active",
        Attribute::required(
            AttributeType::Bool,
            "Whether the workflow should be active. Workflows need a trigger, poller or webhook \
             node to be activated.",
        ),
    )
}

#[async_trait]
impl Resource for WorkflowActivationResource {
    type Model = WorkflowActivationModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(
        &self,
        mut plan: WorkflowActivationModel,
    ) -> Result<Outcome<WorkflowActivationModel>> {
        let current = match self.fetch(&plan.workflow_id).await {
            Ok(workflow) => workflow,
            Err(e) if e.is_not_found() => {
                return Err(ProviderError::NotFound {
                    summary: "Workflow Not Found".to_string(),
                    detail: format!(
                        "The workflow with ID {} does not exist. Please ensure the workflow is \
                         created before managing its activation state.",
                        plan.workflow_id
                    ),
                });
            }
            Err(e) => return Err(read_error(&plan.workflow_id, e)),
        };

        if current.active != plan.active {
            self.transition(&plan.workflow_id, plan.active).await?;
        }

        plan.id = Some(plan.workflow_id.clone());
        Ok(Outcome::persist(plan))
    }

    async fn read(
        &self,
        mut state: WorkflowActivationModel,
    ) -> Result<Outcome<WorkflowActivationModel>> {
        match self.fetch(&state.workflow_id).await {
            Ok(workflow) => {
                state.active = workflow.active;
                Ok(Outcome::persist(state))
            }
            Err(e) if e.is_not_found() => {
                tracing::info!(
                    "Workflow {} no longer exists, removing activation from state",
                    state.workflow_id
                );
                Ok(Outcome::removed())
            }
            Err(e) => Err(read_error(&state.workflow_id, e)),
        }
    }

    async fn update(
        &self,
        mut plan: WorkflowActivationModel,
        prior: WorkflowActivationModel,
    ) -> Result<Outcome<WorkflowActivationModel>> {
        if plan.active != prior.active {
            self.transition(&plan.workflow_id, plan.active).await?;
        }
        plan.id = Some(plan.workflow_id.clone());
        Ok(Outcome::persist(plan))
    }

    async fn delete(&self, state: WorkflowActivationModel) -> Result<Vec<Diagnostic>> {
        match self.fetch(&state.workflow_id).await {
            Ok(workflow) if workflow.active => {
                self.transition(&state.workflow_id, false).await?;
            }
            Ok(_) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(read_error(&state.workflow_id, e)),
        }
        Ok(Vec::new())
    }

    fn import_state(&self, id: &str) -> WorkflowActivationModel {
        WorkflowActivationModel {
            id: Some(id.to_string()),
            workflow_id: id.to_string(),
            active: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use n8nform_client::Method;
    use n8nform_client::testing::MockTransport;
    use serde_json::json;
    use std::sync::Arc;

    const WF_PATH: &str = "/api/v1/workflows/wf1";

    fn setup() -> (Arc<MockTransport>, WorkflowActivationResource) {
        let transport = Arc::new(MockTransport::new());
        let resource = WorkflowActivationResource::new(Client::new(transport.clone()));
        (transport, resource)
    }

    fn workflow(active: bool) -> serde_json::Value {
        json!({"id": "wf1", "name": "x", "active": active, "nodes": [], "connections": {}})
    }

    fn model(active: bool) -> WorkflowActivationModel {
        WorkflowActivationModel {
            id: None,
            workflow_id: "wf1".into(),
            active,
        }
    }

    #[tokio::test]
    async fn test_create_activates_inactive_workflow() {
        let (transport, resource) = setup();
        transport
            .respond(Method::GET, WF_PATH, workflow(false))
            .respond(Method::POST, "/api/v1/workflows/wf1/activate", workflow(true));

        let state = resource.create(model(true)).await.unwrap().state.unwrap();
        assert_eq!(state.id.as_deref(), Some("wf1"));
        assert!(state.active);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_create_without_change_makes_no_transition() {
        let (transport, resource) = setup();
        transport.respond(Method::GET, WF_PATH, workflow(true));

        resource.create(model(true)).await.unwrap();
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_update_deactivates() {
        let (transport, resource) = setup();
        transport.respond(Method::POST, "/api/v1/workflows/wf1/deactivate", workflow(false));

        let state = resource
            .update(model(false), model(true))
            .await
            .unwrap()
            .state
            .unwrap();
        assert!(!state.active);
        assert_eq!(
            transport
                .calls_to(Method::POST, "/api/v1/workflows/wf1/deactivate")
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_delete_deactivates_active_workflow() {
        let (transport, resource) = setup();
        transport
            .respond(Method::GET, WF_PATH, workflow(true))
            .respond(Method::POST, "/api/v1/workflows/wf1/deactivate", workflow(false));

        resource.delete(model(true)).await.unwrap();
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_delete_of_missing_workflow_is_a_no_op() {
        let (transport, resource) = setup();
        transport.respond_status(Method::GET, WF_PATH, 404, "not found");

        let diagnostics = resource.delete(model(true)).await.unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_read_removes_state_on_404() {
        let (transport, resource) = setup();
        transport.respond_status(Method::GET, WF_PATH, 404, "not found");

        assert!(resource.read(model(true)).await.unwrap().is_removed());
    }

    #[test]
    fn test_import_uses_workflow_id() {
        let (_, resource) = setup();
        let state = resource.import_state("wf9");
        assert_eq!(state.id.as_deref(), Some("wf9"));
        assert_eq!(state.workflow_id, "wf9");
    }
}
