//! Workflow endpoints

use crate::client::{Client, NO_BODY};
use crate::error::{ClientError, Result};
use crate::model::{JsonObject, ListResponse, Tag, Workflow, tags_have_ids};
use reqwest::Method;
use serde::Serialize;

/// Body accepted by create/update. `active` and `tags` are read-only on these
/// endpoints: activation has its own endpoints and tags are assigned after
/// the write.
#[derive(Debug, Serialize)]
struct WorkflowPayload<'a> {
    name: &'a str,
    nodes: &'a [serde_json::Value],
    connections: &'a JsonObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    settings: Option<&'a JsonObject>,
}

impl<'a> From<&'a Workflow> for WorkflowPayload<'a> {
    fn from(workflow: &'a Workflow) -> Self {
        Self {
            name: &workflow.name,
            nodes: &workflow.nodes,
            connections: &workflow.connections,
            settings: workflow.settings.as_ref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TagRef<'a> {
    id: &'a str,
}

fn workflow_path(id: &str) -> String {
    format!("/workflows/{}", id)
}

impl Client {
    pub async fn list_workflows(&self) -> Result<Vec<Workflow>> {
        let list: ListResponse<Workflow> =
            self.request_json(Method::GET, "/workflows", NO_BODY).await?;
        Ok(list.data)
    }

    pub async fn get_workflow(&self, id: &str) -> Result<Workflow> {
        self.request_json(Method::GET, &workflow_path(id), NO_BODY)
            .await
    }

    /// Create a workflow, then assign its tags.
    ///
    /// If the tag assignment fails the new workflow is deleted again so that
    /// a failed create leaves nothing behind on the server.
    pub async fn create_workflow(&self, workflow: &Workflow) -> Result<Workflow> {
        let mut created: Workflow = self
            .request_json(
                Method::POST,
                "/workflows",
                Some(&WorkflowPayload::from(workflow)),
            )
            .await?;
        tracing::info!("Created workflow {} ({})", created.name, created.id);

        if tags_have_ids(&workflow.tags) {
            if let Err(err) = self.update_workflow_tags(&created.id, &workflow.tags).await {
                tracing::warn!(
                    "Tag assignment failed for workflow {}, rolling back",
                    created.id
                );
                return Err(match self.delete_workflow(&created.id).await {
                    Ok(()) => ClientError::TagUpdateRolledBack {
                        source: Box::new(err),
                    },
                    Err(rollback) => ClientError::TagUpdateRollbackFailed {
                        source: Box::new(err),
                        rollback: Box::new(rollback),
                    },
                });
            }
            created.tags = workflow.tags.clone();
        }

        Ok(created)
    }

    /// Replace a workflow definition, then assign its tags. No rollback here:
    /// the previous definition is already gone.
    pub async fn update_workflow(&self, id: &str, workflow: &Workflow) -> Result<Workflow> {
        let mut updated: Workflow = self
            .request_json(
                Method::PUT,
                &workflow_path(id),
                Some(&WorkflowPayload::from(workflow)),
            )
            .await?;

        if tags_have_ids(&workflow.tags) {
            self.update_workflow_tags(id, &workflow.tags)
                .await
                .map_err(|err| ClientError::TagUpdate {
                    source: Box::new(err),
                })?;
            updated.tags = workflow.tags.clone();
        }

        Ok(updated)
    }

    pub async fn delete_workflow(&self, id: &str) -> Result<()> {
        self.request(Method::DELETE, &workflow_path(id), NO_BODY)
            .await?;
        Ok(())
    }

    pub async fn activate_workflow(&self, id: &str) -> Result<Workflow> {
        self.request_json(
            Method::POST,
            &format!("{}/activate", workflow_path(id)),
            NO_BODY,
        )
        .await
    }

    pub async fn deactivate_workflow(&self, id: &str) -> Result<Workflow> {
        self.request_json(
            Method::POST,
            &format!("{}/deactivate", workflow_path(id)),
            NO_BODY,
        )
        .await
    }

    /// Assign existing tags to a workflow. Only the ids are sent.
    pub async fn update_workflow_tags(&self, id: &str, tags: &[Tag]) -> Result<()> {
        let payload: Vec<TagRef<'_>> = tags.iter().map(|t| TagRef { id: &t.id }).collect();
        self.request(
            Method::PUT,
            &format!("{}/tags", workflow_path(id)),
            Some(&payload),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn sample_workflow(tags: Vec<Tag>) -> Workflow {
        Workflow {
            name: "Sync".into(),
            active: true,
            nodes: vec![json!({"name": "Start"})],
            connections: serde_json::from_value(json!({"Start": {"main": []}})).unwrap(),
            settings: None,
            tags,
            ..Default::default()
        }
    }

    fn created() -> serde_json::Value {
        json!({
            "id": "wf1",
            "name": "Sync",
            "active": false,
            "nodes": [{"name": "Start"}],
            "connections": {"Start": {"main": []}},
            "createdAt": "2024-01-01",
            "updatedAt": "2024-01-01"
        })
    }

    #[tokio::test]
    async fn test_create_sends_only_writable_fields() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::POST, "/api/v1/workflows", created());
        let client = Client::new(transport.clone());

        let workflow = client
            .create_workflow(&sample_workflow(vec![]))
            .await
            .unwrap();
        assert_eq!(workflow.id, "wf1");

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].body,
            Some(json!({
                "name": "Sync",
                "nodes": [{"name": "Start"}],
                "connections": {"Start": {"main": []}}
            }))
        );
    }

    #[tokio::test]
    async fn test_create_assigns_tags_with_ids() {
        let transport = Arc::new(MockTransport::new());
        transport
            .respond(Method::POST, "/api/v1/workflows", created())
            .respond(Method::PUT, "/api/v1/workflows/wf1/tags", json!([]));
        let client = Client::new(transport.clone());

        let tags = vec![Tag::new("t1", "ops"), Tag::new("", "draft")];
        let workflow = client.create_workflow(&sample_workflow(tags.clone())).await.unwrap();
        assert_eq!(workflow.tags, tags);

        let tag_calls = transport.calls_to(Method::PUT, "/api/v1/workflows/wf1/tags");
        assert_eq!(tag_calls.len(), 1);
        assert_eq!(tag_calls[0].body, Some(json!([{"id": "t1"}, {"id": ""}])));
    }

    #[tokio::test]
    async fn test_create_skips_tag_call_without_ids() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::POST, "/api/v1/workflows", created());
        let client = Client::new(transport.clone());

        client
            .create_workflow(&sample_workflow(vec![Tag::new("", "ops")]))
            .await
            .unwrap();
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_create_rolls_back_when_tags_fail() {
        let transport = Arc::new(MockTransport::new());
        transport
            .respond(Method::POST, "/api/v1/workflows", created())
            .respond_status(Method::PUT, "/api/v1/workflows/wf1/tags", 404, "tag not found")
            .respond_empty(Method::DELETE, "/api/v1/workflows/wf1");
        let client = Client::new(transport.clone());

        let err = client
            .create_workflow(&sample_workflow(vec![Tag::new("missing", "")]))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::TagUpdateRolledBack { .. }));
        assert!(err.to_string().contains("workflow rolled back"));
        assert!(err.to_string().contains("tag not found"));
        assert_eq!(
            transport
                .calls_to(Method::DELETE, "/api/v1/workflows/wf1")
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_create_reports_failed_rollback() {
        let transport = Arc::new(MockTransport::new());
        transport
            .respond(Method::POST, "/api/v1/workflows", created())
            .respond_status(Method::PUT, "/api/v1/workflows/wf1/tags", 400, "bad tag")
            .respond_status(Method::DELETE, "/api/v1/workflows/wf1", 500, "cannot delete");
        let client = Client::new(transport);

        let err = client
            .create_workflow(&sample_workflow(vec![Tag::new("t1", "")]))
            .await
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("bad tag"));
        assert!(msg.contains("also failed to clean up workflow"));
        assert!(msg.contains("cannot delete"));
    }

    #[tokio::test]
    async fn test_update_tag_failure_has_no_rollback() {
        let transport = Arc::new(MockTransport::new());
        transport
            .respond(Method::PUT, "/api/v1/workflows/wf1", created())
            .respond_status(Method::PUT, "/api/v1/workflows/wf1/tags", 400, "bad tag");
        let client = Client::new(transport.clone());

        let err = client
            .update_workflow("wf1", &sample_workflow(vec![Tag::new("t1", "")]))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::TagUpdate { .. }));
        assert!(
            transport
                .calls_to(Method::DELETE, "/api/v1/workflows/wf1")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_activation_endpoints() {
        let transport = Arc::new(MockTransport::new());
        let mut active = created();
        active["active"] = json!(true);
        transport
            .respond(Method::POST, "/api/v1/workflows/wf1/activate", active)
            .respond(Method::POST, "/api/v1/workflows/wf1/deactivate", created());
        let client = Client::new(transport);

        assert!(client.activate_workflow("wf1").await.unwrap().active);
        assert!(!client.deactivate_workflow("wf1").await.unwrap().active);
    }

    #[tokio::test]
    async fn test_list_workflows_unwraps_data() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(
            Method::GET,
            "/api/v1/workflows",
            json!({"data": [created()], "nextCursor": null}),
        );
        let client = Client::new(transport);

        let workflows = client.list_workflows().await.unwrap();
        assert_eq!(workflows.len(), 1);
        assert_eq!(workflows[0].id, "wf1");
    }
}
