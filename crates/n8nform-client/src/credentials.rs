//! Credential endpoints
//!
//! The public API accepts credential writes but does not hand credentials
//! back: `GET /credentials/{id}` answers 405 and there is no list endpoint on
//! current releases. `get_credential` and `list_credentials` exist for
//! servers that do support them; the provider never relies on them.

use crate::client::{Client, NO_BODY};
use crate::error::Result;
use crate::model::{Credential, ListResponse};
use reqwest::Method;

fn credential_path(id: &str) -> String {
    format!("/credentials/{}", id)
}

impl Client {
    pub async fn create_credential(&self, credential: &Credential) -> Result<Credential> {
        let created: Credential = self
            .request_json(Method::POST, "/credentials", Some(credential))
            .await?;
        tracing::info!("Created credential {} ({})", created.name, created.id);
        Ok(created)
    }

    pub async fn get_credential(&self, id: &str) -> Result<Credential> {
        self.request_json(Method::GET, &credential_path(id), NO_BODY)
            .await
    }

    /// Partial update: only name, type and data are sent.
    pub async fn update_credential(&self, id: &str, credential: &Credential) -> Result<Credential> {
        let patch = Credential {
            id: String::new(),
            ..credential.clone()
        };
        self.request_json(Method::PATCH, &credential_path(id), Some(&patch))
            .await
    }

    pub async fn delete_credential(&self, id: &str) -> Result<()> {
        self.request(Method::DELETE, &credential_path(id), NO_BODY)
            .await?;
        Ok(())
    }

    pub async fn list_credentials(&self) -> Result<Vec<Credential>> {
        let list: ListResponse<Credential> = self
            .request_json(Method::GET, "/credentials", NO_BODY)
            .await?;
        Ok(list.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn slack() -> Credential {
        Credential {
            id: "c1".into(),
            name: "Slack".into(),
            credential_type: "slackApi".into(),
            data: serde_json::from_value(json!({"accessToken": "xoxb"})).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_update_patches_name_type_and_data_only() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(
            Method::PATCH,
            "/api/v1/credentials/c1",
            json!({"id": "c1", "name": "Slack", "type": "slackApi"}),
        );
        let client = Client::new(transport.clone());

        client.update_credential("c1", &slack()).await.unwrap();

        let calls = transport.calls_to(Method::PATCH, "/api/v1/credentials/c1");
        assert_eq!(
            calls[0].body,
            Some(json!({"name": "Slack", "type": "slackApi", "data": {"accessToken": "xoxb"}}))
        );
    }

    #[tokio::test]
    async fn test_get_surfaces_method_not_allowed() {
        let transport = Arc::new(MockTransport::new());
        transport.respond_status(
            Method::GET,
            "/api/v1/credentials/c1",
            405,
            "GET method not allowed",
        );
        let client = Client::new(transport);

        let err = client.get_credential("c1").await.unwrap_err();
        assert_eq!(err.status(), Some(405));
        assert!(!err.is_not_found());
    }
}
