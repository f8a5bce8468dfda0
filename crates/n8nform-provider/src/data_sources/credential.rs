//! `n8n_credential` data source
//!
//! n8n offers no way to read credentials back (single GET answers 405 and
//! there is no list), so this data source always fails with guidance. It is
//! not registered with the provider.

use crate::data_source::DataSource;
use crate::error::{ProviderError, Result};
use crate::schema::{Attribute, AttributeType, Schema};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const TYPE_NAME: &str = "n8n_credential";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialDataModel {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub credential_type: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Default)]
pub struct CredentialDataSource;

pub fn schema() -> Schema {
    Schema::new("Fetches an n8n credential. Not supported by the n8n API.")
        .with_attribute("id", Attribute::required(AttributeType::String, "Credential identifier"))
        .with_attribute(
            "name",
            Attribute::computed(AttributeType::String, "Name of the credential"),
        )
        .with_attribute(
            "type",
            Attribute::computed(AttributeType::String, "Type of the credential"),
        )
        .with_attribute(
            "data",
            Attribute::computed(AttributeType::Json, "JSON string representing the credential data")
                .sensitive(),
        )
}

#[async_trait]
impl DataSource for CredentialDataSource {
    type Model = CredentialDataModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn read(&self, config: CredentialDataModel) -> Result<CredentialDataModel> {
        Err(ProviderError::Unsupported {
            summary: "n8n Credential Data Source Not Supported".to_string(),
            detail: format!(
                "The n8n API does not support reading credentials for security reasons. \
                 Credential data sources cannot be used. If you need to reference a credential, \
                 manage it as a resource instead:\n\n\
                 resources:\n  \
                   - type: n8n_credential\n    \
                     name: example\n    \
                     attributes:\n      \
                       name: My Credential\n      \
                       type: httpBasicAuth\n      \
                       data: '{{...}}'\n\n\
                 Then reference it as: ${{n8n_credential.example.id}}\n\n\
                 Credential ID provided: {}",
                config.id
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_always_fails_with_guidance() {
        let err = tokio_test::block_on(CredentialDataSource.read(CredentialDataModel {
            id: "c42".into(),
            ..Default::default()
        }))
        .unwrap_err();

        assert!(matches!(err, ProviderError::Unsupported { .. }));
        assert_eq!(err.summary(), "n8n Credential Data Source Not Supported");
        assert!(err.to_string().contains("${n8n_credential.example.id}"));
        assert!(err.to_string().contains("Credential ID provided: c42"));
    }
}
