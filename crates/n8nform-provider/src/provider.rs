//! Provider root
//!
//! [`N8nProvider::configure`] builds the one [`Client`] of a run. Every
//! controller receives its own clone of that client at construction and
//! never swaps it afterwards.

use crate::data_source::DynDataSource;
use crate::data_sources::{UserDataSource, WorkflowDataSource};
use crate::error::{ProviderError, Result};
use crate::resource::DynResource;
use crate::resources::{
    CredentialResource, UserResource, WorkflowActivationResource, WorkflowResource,
};
use crate::schema::{Attribute, AttributeType, Schema};
use n8nform_client::Client;
use n8nform_config::{ProviderBlock, ProviderSettings};
use std::collections::BTreeMap;

pub const TYPE_NAME: &str = "n8n";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Default, Clone, Copy)]
pub struct N8nProvider;

impl N8nProvider {
    pub fn schema() -> Schema {
        Schema::new("Interact with a self-hosted n8n instance.")
            .with_attribute(
                "endpoint",
                Attribute::optional(
                    AttributeType::String,
                    "The n8n API endpoint URL. May also be provided via the N8N_ENDPOINT environment variable.",
                ),
            )
            .with_attribute(
                "api_key",
                Attribute::optional(
                    AttributeType::String,
                    "The n8n API key. May also be provided via the N8N_API_KEY environment variable.",
                )
                .sensitive(),
            )
    }

    /// Resolve settings from the provider block and the environment, then configure.
    pub fn configure_from_block(block: &ProviderBlock) -> Result<ConfiguredProvider> {
        let settings = ProviderSettings::from_block(block)?;
        Self::configure(&settings)
    }

    pub fn configure(settings: &ProviderSettings) -> Result<ConfiguredProvider> {
        tracing::debug!("Configuring n8n provider for {}", settings.endpoint);
        let client = Client::connect(&settings.endpoint, &settings.api_key)?;
        Ok(ConfiguredProvider::with_client(client))
    }
}

/// Registered resource and data source types sharing one client
pub struct ConfiguredProvider {
    resources: BTreeMap<&'static str, Box<dyn DynResource>>,
    data_sources: BTreeMap<&'static str, Box<dyn DynDataSource>>,
}

impl ConfiguredProvider {
    pub fn with_client(client: Client) -> Self {
        let resources: Vec<Box<dyn DynResource>> = vec![
            Box::new(WorkflowResource::new(client.clone())),
            Box::new(WorkflowActivationResource::new(client.clone())),
            Box::new(CredentialResource::new(client.clone())),
            Box::new(UserResource::new(client.clone())),
        ];
        // The credential data source is left out: n8n cannot read credentials.
        let data_sources: Vec<Box<dyn DynDataSource>> = vec![
            Box::new(WorkflowDataSource::new(client.clone())),
            Box::new(UserDataSource::new(client)),
        ];

        Self {
            resources: resources.into_iter().map(|r| (r.type_name(), r)).collect(),
            data_sources: data_sources
                .into_iter()
                .map(|d| (d.type_name(), d))
                .collect(),
        }
    }

    pub fn resource(&self, type_name: &str) -> Result<&dyn DynResource> {
        self.resources
            .get(type_name)
            .map(|r| r.as_ref())
            .ok_or_else(|| ProviderError::UnknownType {
                kind: "resource",
                type_name: type_name.to_string(),
            })
    }

    pub fn data_source(&self, type_name: &str) -> Result<&dyn DynDataSource> {
        self.data_sources
            .get(type_name)
            .map(|d| d.as_ref())
            .ok_or_else(|| ProviderError::UnknownType {
                kind: "data source",
                type_name: type_name.to_string(),
            })
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    pub fn data_source_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.data_sources.keys().copied()
    }
}

/// Schemas of every registered type, without needing a connection
pub fn schemas() -> ProviderSchemas {
    let mut resources = BTreeMap::new();
    for schema in [
        (crate::resources::workflow::TYPE_NAME, crate::resources::workflow::schema()),
        (
            crate::resources::workflow_activation::TYPE_NAME,
            crate::resources::workflow_activation::schema(),
        ),
        (crate::resources::credential::TYPE_NAME, crate::resources::credential::schema()),
        (crate::resources::user::TYPE_NAME, crate::resources::user::schema()),
    ] {
        resources.insert(schema.0, schema.1);
    }

    let mut data_sources = BTreeMap::new();
    data_sources.insert(
        crate::data_sources::workflow::TYPE_NAME,
        crate::data_sources::workflow::schema(),
    );
    data_sources.insert(
        crate::data_sources::user::TYPE_NAME,
        crate::data_sources::user::schema(),
    );

    ProviderSchemas {
        provider: N8nProvider::schema(),
        resources,
        data_sources,
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ProviderSchemas {
    pub provider: Schema,
    pub resources: BTreeMap<&'static str, Schema>,
    pub data_sources: BTreeMap<&'static str, Schema>,
}
