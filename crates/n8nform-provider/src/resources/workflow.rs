//! `n8n_workflow` resource

use super::workflow_document::WorkflowDefinition;
use crate::diagnostics::Diagnostic;
use crate::error::{ProviderError, Result};
use crate::resource::{Outcome, Resource, to_json_string};
use crate::schema::{Attribute, AttributeType, Schema};
use async_trait::async_trait;
use n8nform_client::{Client, Tag, Workflow};
use serde::{Deserialize, Serialize};

pub const TYPE_NAME: &str = "n8n_workflow";

/// JSON attributes are held as JSON text, the way they appear in configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub workflow_json: Option<String>,
    #[serde(default)]
    pub nodes: Option<String>,
    #[serde(default)]
    pub connections: Option<String>,
    #[serde(default)]
    pub settings: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

pub struct WorkflowResource {
    client: Client,
}

impl WorkflowResource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

pub fn schema() -> Schema {
    Schema::new(
        "Manages an n8n workflow. Either specify individual attributes (name, nodes, connections, ...) \
         or provide a complete workflow export with workflow_json.",
    )
    .with_attribute("id", Attribute::computed(AttributeType::String, "Workflow identifier"))
    .with_attribute(
        "name",
        Attribute::optional_computed(
            AttributeType::String,
            "Name of the workflow. Optional if workflow_json is provided.",
        ),
    )
    .with_attribute(
        "workflow_json",
        Attribute::optional(
            AttributeType::Json,
            "Complete workflow JSON. When provided, name, nodes, connections, settings and tags are \
             extracted from it.",
        ),
    )
    .with_attribute(
        "nodes",
        Attribute::optional_computed(
            AttributeType::Json,
            "JSON array of workflow nodes. Optional if workflow_json is provided.",
        ),
    )
    .with_attribute(
        "connections",
        Attribute::optional_computed(
            AttributeType::Json,
            "JSON object of workflow connections. Optional if workflow_json is provided.",
        ),
    )
    .with_attribute(
        "settings",
        Attribute::optional_computed(AttributeType::Json, "JSON object of workflow settings"),
    )
    .with_attribute(
        "tags",
        Attribute::optional_computed(
            AttributeType::Json,
            "JSON array of workflow tags. Tags must already exist in n8n.",
        ),
    )
    .with_attribute(
        "created_at",
        Attribute::computed(AttributeType::String, "Timestamp when the workflow was created"),
    )
    .with_attribute(
        "updated_at",
        Attribute::computed(AttributeType::String, "Timestamp when the workflow was last updated"),
    )
}

/// `"[]"` when the workflow has no tags
fn tags_json(tags: &[Tag]) -> Result<String> {
    if tags.is_empty() {
        Ok("[]".to_string())
    } else {
        to_json_string("tags", tags)
    }
}

fn refresh_from(model: &mut WorkflowModel, workflow: &Workflow) -> Result<()> {
    model.name = Some(workflow.name.clone());
    model.created_at = Some(workflow.created_at.clone());
    model.updated_at = Some(workflow.updated_at.clone());
    model.nodes = Some(to_json_string("nodes", &workflow.nodes)?);
    model.connections = Some(to_json_string("connections", &workflow.connections)?);
    if let Some(settings) = &workflow.settings {
        model.settings = Some(to_json_string("settings", settings)?);
    }
    model.tags = Some(tags_json(&workflow.tags)?);
    Ok(())
}

#[async_trait]
impl Resource for WorkflowResource {
    type Model = WorkflowModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, mut plan: WorkflowModel) -> Result<Outcome<WorkflowModel>> {
        let definition = WorkflowDefinition::resolve(&plan)?;
        if definition.from_document {
            definition.write_back(&mut plan)?;
        }

        let created = self
            .client
            .create_workflow(&definition.to_workflow())
            .await
            .map_err(|e| {
                ProviderError::remote(
                    "Error creating workflow",
                    "Could not create workflow, unexpected error",
                    e,
                )
            })?;

        plan.id = Some(created.id.clone());
        plan.created_at = Some(created.created_at.clone());
        plan.updated_at = Some(created.updated_at.clone());
        if plan.tags.is_none() {
            plan.tags = Some(tags_json(&created.tags)?);
        }

        tracing::info!("Workflow {} created", created.id);
        Ok(Outcome::persist(plan))
    }

    async fn read(&self, mut state: WorkflowModel) -> Result<Outcome<WorkflowModel>> {
        let id = state.id.clone().unwrap_or_default();
        let workflow = match self.client.get_workflow(&id).await {
            Ok(workflow) => workflow,
            Err(e) if e.is_not_found() => {
                tracing::info!("Workflow {} no longer exists, removing from state", id);
                return Ok(Outcome::removed());
            }
            Err(e) => {
                return Err(ProviderError::remote(
                    "Error Reading n8n Workflow",
                    format!("Could not read n8n workflow ID {}", id),
                    e,
                ));
            }
        };

        refresh_from(&mut state, &workflow)?;
        Ok(Outcome::persist(state))
    }

    async fn update(
        &self,
        mut plan: WorkflowModel,
        prior: WorkflowModel,
    ) -> Result<Outcome<WorkflowModel>> {
        if plan.id.is_none() {
            plan.id = prior.id;
        }
        let id = plan.id.clone().unwrap_or_default();

        let definition = WorkflowDefinition::resolve(&plan)?;
        if definition.from_document {
            definition.write_back(&mut plan)?;
        }

        let updated = self
            .client
            .update_workflow(&id, &definition.to_workflow())
            .await
            .map_err(|e| {
                ProviderError::remote(
                    "Error Updating n8n Workflow",
                    "Could not update workflow, unexpected error",
                    e,
                )
            })?;

        plan.created_at = Some(updated.created_at.clone());
        plan.updated_at = Some(updated.updated_at.clone());
        plan.tags = Some(tags_json(&updated.tags)?);

        tracing::info!("Workflow {} updated", id);
        Ok(Outcome::persist(plan))
    }

    async fn delete(&self, state: WorkflowModel) -> Result<Vec<Diagnostic>> {
        let id = state.id.unwrap_or_default();
        self.client.delete_workflow(&id).await.map_err(|e| {
            ProviderError::remote(
                "Error Deleting n8n Workflow",
                "Could not delete workflow, unexpected error",
                e,
            )
        })?;
        tracing::info!("Workflow {} deleted", id);
        Ok(Vec::new())
    }

    fn import_state(&self, id: &str) -> WorkflowModel {
        WorkflowModel {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }
}
