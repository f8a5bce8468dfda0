//! Read-only data sources

use crate::error::{ProviderError, Result};
use crate::schema::Schema;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A single query against n8n. Nothing is kept between reads and every
/// error, including not-found, is returned to the caller.
#[async_trait]
pub trait DataSource: Send + Sync {
    type Model: Serialize + DeserializeOwned + Send + 'static;

    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn read(&self, config: Self::Model) -> Result<Self::Model>;
}

/// Object-safe view of a [`DataSource`] over raw JSON attributes
#[async_trait]
pub trait DynDataSource: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn schema(&self) -> Schema;
    async fn read_json(&self, config: Value) -> Result<Value>;
}

#[async_trait]
impl<D: DataSource> DynDataSource for D {
    fn type_name(&self) -> &'static str {
        DataSource::type_name(self)
    }

    fn schema(&self) -> Schema {
        DataSource::schema(self)
    }

    async fn read_json(&self, config: Value) -> Result<Value> {
        let config = serde_json::from_value(config).map_err(|source| ProviderError::Decode {
            type_name: DataSource::type_name(self).to_string(),
            source,
        })?;
        Ok(serde_json::to_value(self.read(config).await?)?)
    }
}
