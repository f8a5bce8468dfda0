//! `n8n_workflow` data source

use crate::data_source::DataSource;
use crate::error::{ProviderError, Result};
use crate::resource::to_json_string;
use crate::schema::{Attribute, AttributeType, Schema};
use async_trait::async_trait;
use n8nform_client::Client;
use serde::{Deserialize, Serialize};

pub const TYPE_NAME: &str = "n8n_workflow";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDataModel {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
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

pub struct WorkflowDataSource {
    client: Client,
}

impl WorkflowDataSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

pub fn schema() -> Schema {
    Schema::new("Fetches an n8n workflow.")
        .with_attribute("id", Attribute::required(AttributeType::String, "Workflow identifier"))
        .with_attribute("name", Attribute::computed(AttributeType::String, "Name of the workflow"))
        .with_attribute(
            "active",
            Attribute::computed(AttributeType::Bool, "Whether the workflow is active"),
        )
        .with_attribute(
            "nodes",
            Attribute::computed(AttributeType::Json, "JSON string representing the workflow nodes"),
        )
        .with_attribute(
            "connections",
            Attribute::computed(
                AttributeType::Json,
                "JSON string representing the workflow connections",
            ),
        )
        .with_attribute(
            "settings",
            Attribute::computed(
                AttributeType::Json,
                "JSON string representing the workflow settings",
            ),
        )
        .with_attribute(
            "tags",
            Attribute::computed(AttributeType::Json, "JSON string representing the workflow tags"),
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

#[async_trait]
impl DataSource for WorkflowDataSource {
    type Model = WorkflowDataModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn read(&self, config: WorkflowDataModel) -> Result<WorkflowDataModel> {
        let workflow = self.client.get_workflow(&config.id).await.map_err(|e| {
            ProviderError::remote(
                "Error Reading n8n Workflow",
                format!("Could not read n8n workflow ID {}", config.id),
                e,
            )
        })?;

        Ok(WorkflowDataModel {
            id: workflow.id.clone(),
            name: Some(workflow.name.clone()),
            active: Some(workflow.active),
            nodes: Some(to_json_string("nodes", &workflow.nodes)?),
            connections: Some(to_json_string("connections", &workflow.connections)?),
            settings: workflow
                .settings
                .as_ref()
                .map(|s| to_json_string("settings", s))
                .transpose()?,
            tags: if workflow.tags.is_empty() {
                None
            } else {
                Some(to_json_string("tags", &workflow.tags)?)
            },
            created_at: Some(workflow.created_at),
            updated_at: Some(workflow.updated_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use n8nform_client::Method;
    use n8nform_client::testing::MockTransport;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_read_projects_workflow() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(
            Method::GET,
            "/api/v1/workflows/wf1",
            json!({
                "id": "wf1",
                "name": "Nightly sync",
                "active": true,
                "nodes": [],
                "connections": {},
                "tags": [{"id": "t1", "name": "ops"}]
            }),
        );
        let source = WorkflowDataSource::new(Client::new(transport));

        let model = source
            .read(WorkflowDataModel {
                id: "wf1".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(model.active, Some(true));
        assert_eq!(model.nodes.as_deref(), Some("[]"));
        assert_eq!(model.tags.as_deref(), Some(r#"[{"id":"t1","name":"ops"}]"#));
        assert!(model.settings.is_none());
    }

    #[tokio::test]
    async fn test_not_found_is_an_error() {
        let transport = Arc::new(MockTransport::new());
        transport.respond_status(Method::GET, "/api/v1/workflows/wf1", 404, "not found");
        let source = WorkflowDataSource::new(Client::new(transport));

        let err = source
            .read(WorkflowDataModel {
                id: "wf1".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Could not read n8n workflow ID wf1"));
    }
}
