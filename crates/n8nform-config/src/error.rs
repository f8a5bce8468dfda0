use std::path::PathBuf;
use thiserror::Error;

/// A provider setting that could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingSetting {
    /// Attribute name in the manifest (`endpoint`, `api_key`)
    pub field: &'static str,
    /// Environment variable consulted as the fallback
    pub env_var: &'static str,
}

impl std::fmt::Display for MissingSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "missing or empty value for '{}'. Set it in the provider configuration or use the {} environment variable",
            self.field, self.env_var
        )
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config directory not found")]
    ConfigDirNotFound,

    #[error(
        "manifest not found. Looked in:\n\
        - current directory: n8nform.local.yaml, n8nform.yaml\n\
        - ./.n8nform/ directory\n\
        - ~/.config/n8nform/n8nform.yaml\n\
        Set N8NFORM_CONFIG_PATH to point at a manifest directly"
    )]
    ManifestNotFound,

    #[error("cannot create the n8n API client:\n{}", format_missing(.0))]
    MissingSettings(Vec<MissingSetting>),

    #[error("invalid manifest {path}: {message}")]
    InvalidManifest { path: PathBuf, message: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_missing(missing: &[MissingSetting]) -> String {
    missing
        .iter()
        .map(|m| format!("  - {}", m))
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, ConfigError>;
