//! Resource lifecycle trait
//!
//! Every managed entity (workflow, activation, credential, user) implements
//! [`Resource`] over its own typed model. The engine and the provider
//! registry work through the type-erased [`DynResource`], which every
//! `Resource` gets for free.

use crate::diagnostics::Diagnostic;
use crate::error::{ProviderError, Result};
use crate::schema::Schema;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Result of a lifecycle call
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<M> {
    /// `None` removes the instance from local state
    pub state: Option<M>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<M> Outcome<M> {
    pub fn persist(state: M) -> Self {
        Self {
            state: Some(state),
            diagnostics: Vec::new(),
        }
    }

    /// The remote entity is gone; drop it from local state.
    pub fn removed() -> Self {
        Self {
            state: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }

    pub fn is_removed(&self) -> bool {
        self.state.is_none()
    }

    pub fn try_map<N, E>(self, f: impl FnOnce(M) -> std::result::Result<N, E>) -> std::result::Result<Outcome<N>, E> {
        Ok(Outcome {
            state: self.state.map(f).transpose()?,
            diagnostics: self.diagnostics,
        })
    }
}

/// Lifecycle callbacks of a managed resource type
#[async_trait]
pub trait Resource: Send + Sync {
    type Model: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// Type name, e.g. `n8n_workflow`
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Create the remote entity from the planned model
    async fn create(&self, plan: Self::Model) -> Result<Outcome<Self::Model>>;

    /// Refresh local state from the remote entity
    async fn read(&self, state: Self::Model) -> Result<Outcome<Self::Model>>;

    async fn update(&self, plan: Self::Model, prior: Self::Model) -> Result<Outcome<Self::Model>>;

    /// Delete the remote entity. Local state is always dropped on `Ok`; the
    /// returned diagnostics are warnings only.
    async fn delete(&self, state: Self::Model) -> Result<Vec<Diagnostic>>;

    /// Skeleton state for an imported id, completed by a following `read`
    fn import_state(&self, id: &str) -> Self::Model;
}

/// Object-safe view of a [`Resource`] over raw JSON attributes
#[async_trait]
pub trait DynResource: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn schema(&self) -> Schema;
    async fn create_json(&self, plan: Value) -> Result<Outcome<Value>>;
    async fn read_json(&self, state: Value) -> Result<Outcome<Value>>;
    async fn update_json(&self, plan: Value, prior: Value) -> Result<Outcome<Value>>;
    async fn delete_json(&self, state: Value) -> Result<Vec<Diagnostic>>;
    fn import_json(&self, id: &str) -> Result<Value>;
}

fn decode<M: DeserializeOwned>(type_name: &str, value: Value) -> Result<M> {
    serde_json::from_value(value).map_err(|source| ProviderError::Decode {
        type_name: type_name.to_string(),
        source,
    })
}

fn encode<M: Serialize>(outcome: Outcome<M>) -> Result<Outcome<Value>> {
    Ok(outcome.try_map(serde_json::to_value)?)
}

#[async_trait]
impl<R: Resource> DynResource for R {
    fn type_name(&self) -> &'static str {
        Resource::type_name(self)
    }

    fn schema(&self) -> Schema {
        Resource::schema(self)
    }

    async fn create_json(&self, plan: Value) -> Result<Outcome<Value>> {
        let plan = decode(Resource::type_name(self), plan)?;
        encode(self.create(plan).await?)
    }

    async fn read_json(&self, state: Value) -> Result<Outcome<Value>> {
        let state = decode(Resource::type_name(self), state)?;
        encode(self.read(state).await?)
    }

    async fn update_json(&self, plan: Value, prior: Value) -> Result<Outcome<Value>> {
        let plan = decode(Resource::type_name(self), plan)?;
        let prior = decode(Resource::type_name(self), prior)?;
        encode(self.update(plan, prior).await?)
    }

    async fn delete_json(&self, state: Value) -> Result<Vec<Diagnostic>> {
        let state = decode(Resource::type_name(self), state)?;
        self.delete(state).await
    }

    fn import_json(&self, id: &str) -> Result<Value> {
        Ok(serde_json::to_value(self.import_state(id))?)
    }
}

/// Serialize a JSON document for storage in a string attribute
pub(crate) fn to_json_string<T: Serialize + ?Sized>(field: &str, value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| {
        ProviderError::field(field, format!("Could not marshal {} to JSON: {}", field, e))
    })
}
