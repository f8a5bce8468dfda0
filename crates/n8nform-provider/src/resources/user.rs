//! `n8n_user` resource

use crate::diagnostics::Diagnostic;
use crate::error::{ProviderError, Result};
use crate::resource::{Outcome, Resource};
use crate::schema::{Attribute, AttributeType, Schema};
use async_trait::async_trait;
use n8nform_client::{Client, User};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const TYPE_NAME: &str = "n8n_user";
pub const DEFAULT_ROLE: &str = "global:member";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub is_pending: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl UserModel {
    fn requested_role(&self) -> &str {
        self.role.as_deref().unwrap_or(DEFAULT_ROLE)
    }

    fn refresh_from(&mut self, user: &User) {
        self.id = Some(user.id.clone());
        self.email = user.email.clone();
        self.role = Some(user.role().to_string());
        self.is_owner = user.is_owner;
        self.is_pending = user.is_pending;
        self.created_at = Some(user.created_at.clone());
        self.updated_at = Some(user.updated_at.clone());
    }
}

pub struct UserResource {
    client: Client,
}

impl UserResource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

pub fn schema() -> Schema {
    Schema::new("Manages an n8n user.")
        .with_attribute("id", Attribute::computed(AttributeType::String, "User identifier"))
        .with_attribute(
            "email",
            Attribute::required(
                AttributeType::String,
                "Email address of the user (cannot be changed after creation)",
            )
            .requires_replace(),
        )
        .with_attribute(
            "role",
            Attribute::optional_computed(
                AttributeType::String,
                "Role of the user (e.g., 'global:owner', 'global:admin', 'global:member')",
            )
            .with_default(json!(DEFAULT_ROLE)),
        )
        .with_attribute(
            "is_owner",
            Attribute::computed(AttributeType::Bool, "Whether the user is an owner"),
        )
        .with_attribute(
            "is_pending",
            Attribute::computed(
                AttributeType::Bool,
                "Whether the user account is pending activation",
            ),
        )
        .with_attribute(
            "created_at",
            Attribute::computed(AttributeType::String, "Timestamp when the user was created"),
        )
        .with_attribute(
            "updated_at",
            Attribute::computed(AttributeType::String, "Timestamp when the user was last updated"),
        )
}

#[async_trait]
impl Resource for UserResource {
    type Model = UserModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, mut plan: UserModel) -> Result<Outcome<UserModel>> {
        let role = plan.requested_role().to_string();
        let user = self
            .client
            .create_user(&plan.email, &role)
            .await
            .map_err(|e| {
                ProviderError::remote(
                    "Error creating user",
                    "Could not create user, unexpected error",
                    e,
                )
            })?;

        plan.refresh_from(&user);
        tracing::info!("User {} created with role {}", user.id, role);
        Ok(Outcome::persist(plan))
    }

    async fn read(&self, mut state: UserModel) -> Result<Outcome<UserModel>> {
        let id = state.id.clone().unwrap_or_default();
        match self.client.get_user(&id).await {
            Ok(user) => {
                state.refresh_from(&user);
                Ok(Outcome::persist(state))
            }
            Err(e) if e.is_not_found() => {
                tracing::info!("User {} no longer exists, removing from state", id);
                Ok(Outcome::removed())
            }
            Err(e) => Err(ProviderError::remote(
                "Error Reading n8n User",
                format!("Could not read n8n user ID {}", id),
                e,
            )),
        }
    }

    async fn update(&self, mut plan: UserModel, prior: UserModel) -> Result<Outcome<UserModel>> {
        if plan.id.is_none() {
            plan.id = prior.id;
        }
        let id = plan.id.clone().unwrap_or_default();
        let role = plan.requested_role().to_string();

        let user = self
            .client
            .update_user_role(&id, &role)
            .await
            .map_err(|e| {
                ProviderError::remote(
                    "Error Updating n8n User",
                    "Could not update user, unexpected error",
                    e,
                )
            })?;

        plan.refresh_from(&user);
        tracing::info!("User {} now has role {}", id, role);
        Ok(Outcome::persist(plan))
    }

    /// Some deployments only allow deleting users from the n8n UI. A failed
    /// delete is reported as a warning and the user leaves state anyway.
    async fn delete(&self, state: UserModel) -> Result<Vec<Diagnostic>> {
        let id = state.id.unwrap_or_default();
        match self.client.delete_user(&id).await {
            Ok(()) => {
                tracing::info!("User {} deleted", id);
                Ok(Vec::new())
            }
            Err(e) => {
                tracing::warn!("Could not delete user {}: {}", id, e);
                Ok(vec![Diagnostic::warning(
                    "Error Deleting n8n User",
                    format!(
                        "Could not delete user {} via API: {}. The user may need to be deleted \
                         manually through the n8n UI. The resource will be removed from state.",
                        id, e
                    ),
                )])
            }
        }
    }

    fn import_state(&self, id: &str) -> UserModel {
        UserModel {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use n8nform_client::Method;
    use n8nform_client::testing::MockTransport;
    use std::sync::Arc;

    fn setup() -> (Arc<MockTransport>, UserResource) {
        let transport = Arc::new(MockTransport::new());
        let resource = UserResource::new(Client::new(transport.clone()));
        (transport, resource)
    }

    #[tokio::test]
    async fn test_create_keeps_requested_role_when_read_has_none() {
        let (transport, resource) = setup();
        transport
            .respond(
                Method::POST,
                "/api/v1/users",
                json!([{"user": {"id": "u1", "email": "ana@example.com"}, "error": ""}]),
            )
            .respond(
                Method::GET,
                "/api/v1/users/u1",
                json!({"id": "u1", "email": "ana@example.com", "isPending": true}),
            );

        let plan = UserModel {
            email: "ana@example.com".into(),
            role: Some("global:admin".into()),
            ..Default::default()
        };
        let state = resource.create(plan).await.unwrap().state.unwrap();
        assert_eq!(state.id.as_deref(), Some("u1"));
        assert_eq!(state.role.as_deref(), Some("global:admin"));
        assert!(state.is_pending);
    }

    #[tokio::test]
    async fn test_create_defaults_role() {
        let (transport, resource) = setup();
        transport
            .respond(
                Method::POST,
                "/api/v1/users",
                json!([{"user": {"id": "u2", "email": "bo@example.com"}}]),
            )
            .respond(
                Method::GET,
                "/api/v1/users/u2",
                json!({"id": "u2", "email": "bo@example.com"}),
            );

        let plan = UserModel {
            email: "bo@example.com".into(),
            ..Default::default()
        };
        let state = resource.create(plan).await.unwrap().state.unwrap();
        assert_eq!(state.role.as_deref(), Some(DEFAULT_ROLE));

        let body = transport.calls()[0].body.clone().unwrap();
        assert_eq!(body, json!([{"email": "bo@example.com", "role": DEFAULT_ROLE}]));
    }

    #[tokio::test]
    async fn test_create_item_error_is_fatal() {
        let (transport, resource) = setup();
        transport.respond(
            Method::POST,
            "/api/v1/users",
            json!([{"user": {}, "error": "email already in use"}]),
        );

        let plan = UserModel {
            email: "ana@example.com".into(),
            ..Default::default()
        };
        let err = resource.create(plan).await.unwrap_err();
        assert_eq!(err.summary(), "Error creating user");
        assert!(err.to_string().contains("API error: email already in use"));
    }

    #[tokio::test]
    async fn test_update_changes_role_only() {
        let (transport, resource) = setup();
        transport
            .respond_empty(Method::PATCH, "/api/v1/users/u1/role")
            .respond(
                Method::GET,
                "/api/v1/users/u1",
                json!({"id": "u1", "email": "ana@example.com", "role": "global:admin"}),
            );

        let prior = UserModel {
            id: Some("u1".into()),
            email: "ana@example.com".into(),
            role: Some(DEFAULT_ROLE.into()),
            ..Default::default()
        };
        let plan = UserModel {
            role: Some("global:admin".into()),
            ..prior.clone()
        };
        let state = resource.update(plan, prior).await.unwrap().state.unwrap();
        assert_eq!(state.role.as_deref(), Some("global:admin"));

        let patch = transport.calls_to(Method::PATCH, "/api/v1/users/u1/role");
        assert_eq!(patch[0].body, Some(json!({"newRoleName": "global:admin"})));
    }

    #[tokio::test]
    async fn test_delete_failure_is_a_warning() {
        let (transport, resource) = setup();
        transport.respond_status(Method::DELETE, "/api/v1/users/u1", 403, "forbidden");

        let diagnostics = resource.delete(resource.import_state("u1")).await.unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].summary, "Error Deleting n8n User");
        assert!(diagnostics[0].detail.contains("u1"));
    }

    #[tokio::test]
    async fn test_read_removes_state_on_404() {
        let (transport, resource) = setup();
        transport.respond_status(Method::GET, "/api/v1/users/u1", 404, "not found");

        let outcome = resource.read(resource.import_state("u1")).await.unwrap();
        assert!(outcome.is_removed());
    }
}
