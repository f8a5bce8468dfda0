//! Provider error types
//!
//! Four kinds of failure reach the caller:
//! - local validation ([`ProviderError::Validation`]), always fatal
//! - remote rejections ([`ProviderError::Remote`]) carrying the requested identity
//! - tolerated failures, which are not errors but warning diagnostics
//! - tag rollback failures, which arrive as one combined client error

use n8nform_client::ClientError;
use n8nform_config::ConfigError;
use serde::Serialize;
use thiserror::Error;

/// A problem with one attribute of a configuration or document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid configuration: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("{summary}: {detail}")]
    Remote {
        summary: String,
        detail: String,
        #[source]
        source: ClientError,
    },

    #[error("{summary}: {detail}")]
    NotFound { summary: String, detail: String },

    #[error("{summary}: {detail}")]
    Unsupported { summary: String, detail: String },

    #[error("Unknown {kind} type: {type_name}")]
    UnknownType { kind: &'static str, type_name: String },

    #[error("Invalid {type_name} attributes: {source}")]
    Decode {
        type_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("State file error: {0}")]
    State(String),

    #[error("Lock acquisition failed: {0}")]
    Lock(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ProviderError {
    /// Wrap a client error. The detail keeps the full client message, so a
    /// `404` in it stays visible to callers.
    pub fn remote(summary: impl Into<String>, context: impl AsRef<str>, source: ClientError) -> Self {
        Self::Remote {
            summary: summary.into(),
            detail: format!("{}: {}", context.as_ref(), source),
            source,
        }
    }

    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    /// Short headline for CLI output
    pub fn summary(&self) -> &str {
        match self {
            Self::Validation(_) => "Invalid configuration",
            Self::Remote { summary, .. }
            | Self::NotFound { summary, .. }
            | Self::Unsupported { summary, .. } => summary,
            Self::UnknownType { .. } => "Unknown type",
            Self::Decode { .. } => "Invalid attributes",
            Self::State(_) | Self::Lock(_) => "State error",
            Self::Config(_) => "Configuration error",
            Self::Client(_) => "Client error",
            Self::Io(_) => "IO error",
            Self::Json(_) => "JSON error",
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_lists_every_field() {
        let err = ProviderError::Validation(vec![
            FieldError::new("nodes", "Could not parse nodes JSON: EOF"),
            FieldError::new("connections", "must be an object"),
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid configuration: nodes: Could not parse nodes JSON: EOF; connections: must be an object"
        );
    }

    #[test]
    fn test_remote_detail_includes_identity_and_status() {
        let err = ProviderError::remote(
            "Error Reading n8n Workflow",
            "Could not read n8n workflow ID wf1",
            ClientError::Api {
                status: 500,
                body: "oops".into(),
            },
        );
        assert_eq!(err.summary(), "Error Reading n8n Workflow");
        assert!(err.to_string().contains("workflow ID wf1"));
        assert!(err.to_string().contains("status 500: oops"));
    }
}
