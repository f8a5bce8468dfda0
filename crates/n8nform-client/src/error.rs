//! n8n API client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("failed to execute request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to unmarshal response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no user returned from API")]
    EmptyUserResponse,

    #[error("API error: {0}")]
    BatchItem(String),

    #[error("failed to update workflow tags: {source} (hint: tags must exist in n8n before assigning them to workflows)")]
    TagUpdate { source: Box<ClientError> },

    #[error("failed to update workflow tags, workflow rolled back: {source} (hint: tags must exist in n8n before assigning them to workflows)")]
    TagUpdateRolledBack { source: Box<ClientError> },

    #[error(
        "failed to update workflow tags: {source} (also failed to clean up workflow: {rollback}) - hint: tags must exist in n8n before assigning them to workflows"
    )]
    TagUpdateRollbackFailed {
        source: Box<ClientError>,
        rollback: Box<ClientError>,
    },

    /// Produced by the scripted test transport only.
    #[cfg(any(test, feature = "testing"))]
    #[error("transport failure: {0}")]
    Transport(String),
}

impl ClientError {
    /// Whether the remote reported that the entity does not exist.
    ///
    /// Callers rely on the presence of `404` in the error text, so any error
    /// whose message carries the status (including wrapped ones) matches.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. }) || self.to_string().contains("404")
    }

    /// HTTP status of a remote rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, body: &str) -> ClientError {
        ClientError::Api {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_api_error_message_carries_status_and_body() {
        let err = api(500, r#"{"message":"boom"}"#);
        assert_eq!(
            err.to_string(),
            r#"API request failed with status 500: {"message":"boom"}"#
        );
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_scripted_transport_failure_is_not_a_remote_error() {
        let err = ClientError::Transport("no scripted response for GET /api/v1/workflows/1".into());
        assert_eq!(err.status(), None);
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("transport failure:"));
    }

    #[test]
    fn test_not_found_detection() {
        assert!(api(404, "Not Found").is_not_found());
        assert!(!api(400, "bad request").is_not_found());
        assert!(!ClientError::EmptyUserResponse.is_not_found());
    }

    #[test]
    fn test_rollback_failure_mentions_both_errors() {
        let err = ClientError::TagUpdateRollbackFailed {
            source: Box::new(api(400, "unknown tag")),
            rollback: Box::new(api(500, "db locked")),
        };
        let msg = err.to_string();
        assert!(msg.contains("unknown tag"));
        assert!(msg.contains("also failed to clean up workflow"));
        assert!(msg.contains("db locked"));
        assert!(msg.contains("tags must exist in n8n"));
    }
}
