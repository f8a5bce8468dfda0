//! `n8n_credential` resource
//!
//! n8n never returns credential contents, so nothing can be refreshed:
//! `read` hands back the stored state without contacting the server and
//! drift made outside n8nform stays invisible.

use crate::diagnostics::Diagnostic;
use crate::error::{ProviderError, Result};
use crate::resource::{Outcome, Resource};
use crate::schema::{Attribute, AttributeType, Schema};
use async_trait::async_trait;
use n8nform_client::{Client, Credential, JsonObject};
use serde::{Deserialize, Serialize};

pub const TYPE_NAME: &str = "n8n_credential";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub credential_type: String,
    /// JSON object as text
    #[serde(default)]
    pub data: String,
}

impl CredentialModel {
    fn to_credential(&self) -> Result<Credential> {
        let data: JsonObject = serde_json::from_str(&self.data).map_err(|e| {
            ProviderError::field("data", format!("Could not parse data JSON: {}", e))
        })?;
        Ok(Credential {
            id: String::new(),
            name: self.name.clone(),
            credential_type: self.credential_type.clone(),
            data: Some(data),
        })
    }
}

pub struct CredentialResource {
    client: Client,
}

impl CredentialResource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

pub fn schema() -> Schema {
    Schema::new("Manages an n8n credential.")
        .with_attribute("id", Attribute::computed(AttributeType::String, "Credential identifier"))
        .with_attribute(
            "name",
            Attribute::required(AttributeType::String, "Name of the credential"),
        )
        .with_attribute(
            "type",
            Attribute::required(
                AttributeType::String,
                "Type of the credential (e.g., 'httpBasicAuth', 'slackApi')",
            ),
        )
        .with_attribute(
            "data",
            Attribute::required(AttributeType::Json, "JSON object holding the credential data")
                .sensitive(),
        )
}

#[async_trait]
impl Resource for CredentialResource {
    type Model = CredentialModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, mut plan: CredentialModel) -> Result<Outcome<CredentialModel>> {
        let credential = plan.to_credential()?;
        let created = self
            .client
            .create_credential(&credential)
            .await
            .map_err(|e| {
                ProviderError::remote(
                    "Error creating credential",
                    "Could not create credential, unexpected error",
                    e,
                )
            })?;

        tracing::info!("Credential {} created", created.id);
        plan.id = Some(created.id);
        Ok(Outcome::persist(plan))
    }

    async fn read(&self, state: CredentialModel) -> Result<Outcome<CredentialModel>> {
        Ok(Outcome::persist(state))
    }

    async fn update(
        &self,
        mut plan: CredentialModel,
        prior: CredentialModel,
    ) -> Result<Outcome<CredentialModel>> {
        if plan.id.is_none() {
            plan.id = prior.id;
        }
        let id = plan.id.clone().unwrap_or_default();
        let credential = plan.to_credential()?;

        self.client
            .update_credential(&id, &credential)
            .await
            .map_err(|e| {
                ProviderError::remote(
                    "Error Updating n8n Credential",
                    "Could not update credential, unexpected error",
                    e,
                )
            })?;

        tracing::info!("Credential {} updated", id);
        Ok(Outcome::persist(plan))
    }

    async fn delete(&self, state: CredentialModel) -> Result<Vec<Diagnostic>> {
        let id = state.id.unwrap_or_default();
        self.client.delete_credential(&id).await.map_err(|e| {
            ProviderError::remote(
                "Error Deleting n8n Credential",
                "Could not delete credential, unexpected error",
                e,
            )
        })?;
        tracing::info!("Credential {} deleted", id);
        Ok(Vec::new())
    }

    fn import_state(&self, id: &str) -> CredentialModel {
        CredentialModel {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }
}
