//! Manifest: the declared provider settings, resources and data sources
//!
//! ```yaml
//! provider:
//!   endpoint: https://n8n.example.com
//! resources:
//!   - type: n8n_workflow
//!     name: nightly
//!     attributes:
//!       workflow_json: '{"name": "Nightly", "nodes": [], "connections": {}}'
//!   - type: n8n_workflow_activation
//!     name: nightly
//!     attributes:
//!       workflow_id: "42"
//!       active: true
//! data:
//!   - type: n8n_user
//!     name: owner
//!     attributes:
//!       id: "owner@example.com"
//! ```

use crate::error::{ConfigError, Result};
use crate::settings::ProviderBlock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub provider: ProviderBlock,

    #[serde(default)]
    pub resources: Vec<Declaration>,

    #[serde(default)]
    pub data: Vec<Declaration>,
}

/// A declared resource or data source instance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Declaration {
    #[serde(rename = "type")]
    pub type_name: String,

    pub name: String,

    #[serde(default = "empty_object")]
    pub attributes: serde_json::Value,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

impl Declaration {
    pub fn new(
        type_name: impl Into<String>,
        name: impl Into<String>,
        attributes: serde_json::Value,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            attributes,
        }
    }

    /// `<type>.<name>`, unique within a manifest
    pub fn address(&self) -> String {
        format!("{}.{}", self.type_name, self.name)
    }
}

impl Manifest {
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let manifest: Manifest = serde_yaml::from_str(content)?;
        manifest.validate(path)?;
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!("Loading manifest {}", path.display());
        Self::parse(&content, path)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        for (kind, declarations) in [("resource", &self.resources), ("data", &self.data)] {
            let mut seen = HashSet::new();
            for declaration in declarations {
                if declaration.name.is_empty() {
                    return Err(ConfigError::InvalidManifest {
                        path: path.to_path_buf(),
                        message: format!("{} of type {} has no name", kind, declaration.type_name),
                    });
                }
                if !declaration.attributes.is_object() {
                    return Err(ConfigError::InvalidManifest {
                        path: path.to_path_buf(),
                        message: format!("attributes of {} must be a mapping", declaration.address()),
                    });
                }
                if !seen.insert(declaration.address()) {
                    return Err(ConfigError::InvalidManifest {
                        path: path.to_path_buf(),
                        message: format!("duplicate {} {}", kind, declaration.address()),
                    });
                }
            }
        }
        Ok(())
    }
}
