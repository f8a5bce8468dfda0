//! `n8n_user` data source

use crate::data_source::DataSource;
use crate::error::{ProviderError, Result};
use crate::schema::{Attribute, AttributeType, Schema};
use async_trait::async_trait;
use n8nform_client::Client;
use serde::{Deserialize, Serialize};

pub const TYPE_NAME: &str = "n8n_user";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDataModel {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_owner: Option<bool>,
    #[serde(default)]
    pub is_pending: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

pub struct UserDataSource {
    client: Client,
}

impl UserDataSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

pub fn schema() -> Schema {
    Schema::new("Fetches an n8n user.")
        .with_attribute("id", Attribute::required(AttributeType::String, "User identifier"))
        .with_attribute(
            "email",
            Attribute::computed(AttributeType::String, "Email address of the user"),
        )
        .with_attribute("role", Attribute::computed(AttributeType::String, "Role of the user"))
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
impl DataSource for UserDataSource {
    type Model = UserDataModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn read(&self, config: UserDataModel) -> Result<UserDataModel> {
        let user = self.client.get_user(&config.id).await.map_err(|e| {
            ProviderError::remote(
                "Error Reading n8n User",
                format!("Could not read n8n user ID {}", config.id),
                e,
            )
        })?;

        Ok(UserDataModel {
            id: user.id.clone(),
            email: Some(user.email.clone()),
            role: Some(user.role().to_string()),
            is_owner: Some(user.is_owner),
            is_pending: Some(user.is_pending),
            created_at: Some(user.created_at),
            updated_at: Some(user.updated_at),
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
    async fn test_read_uses_global_role_fallback() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(
            Method::GET,
            "/api/v1/users/u1",
            json!({"id": "u1", "email": "ana@example.com", "globalRole": "global:owner", "isOwner": true}),
        );
        let source = UserDataSource::new(Client::new(transport));

        let model = source
            .read(UserDataModel {
                id: "u1".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(model.role.as_deref(), Some("global:owner"));
        assert_eq!(model.is_owner, Some(true));
        assert_eq!(model.email.as_deref(), Some("ana@example.com"));
    }
}
