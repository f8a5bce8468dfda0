//! Provider connection settings
//!
//! Each setting comes from an explicit value or from its environment
//! variable. An explicit value always wins, and both settings must end up
//! non-empty.

use crate::error::{ConfigError, MissingSetting, Result};
use serde::{Deserialize, Serialize};

pub const ENDPOINT_ENV: &str = "N8N_ENDPOINT";
pub const API_KEY_ENV: &str = "N8N_API_KEY";

/// Provider block as written in the manifest. Both fields are optional there.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderBlock {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Fully resolved connection settings
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub endpoint: String,
    pub api_key: String,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn resolve_value(explicit: Option<&str>, env_var: &str) -> String {
    match explicit {
        Some(value) => value.to_string(),
        None => std::env::var(env_var).unwrap_or_default(),
    }
}

impl ProviderSettings {
    /// Resolve settings, reporting every missing field at once.
    pub fn resolve(endpoint: Option<&str>, api_key: Option<&str>) -> Result<Self> {
        let endpoint = resolve_value(endpoint, ENDPOINT_ENV);
        let api_key = resolve_value(api_key, API_KEY_ENV);

        let mut missing = Vec::new();
        if endpoint.is_empty() {
            missing.push(MissingSetting {
                field: "endpoint",
                env_var: ENDPOINT_ENV,
            });
        }
        if api_key.is_empty() {
            missing.push(MissingSetting {
                field: "api_key",
                env_var: API_KEY_ENV,
            });
        }

        if !missing.is_empty() {
            return Err(ConfigError::MissingSettings(missing));
        }

        tracing::debug!("Resolved n8n endpoint: {}", endpoint);
        Ok(Self { endpoint, api_key })
    }

    pub fn from_block(block: &ProviderBlock) -> Result<Self> {
        Self::resolve(block.endpoint.as_deref(), block.api_key.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_explicit_values_win_over_env() {
        temp_env::with_vars(
            [
                (ENDPOINT_ENV, Some("https://env.example.com")),
                (API_KEY_ENV, Some("env-key")),
            ],
            || {
                let settings =
                    ProviderSettings::resolve(Some("https://explicit.example.com"), Some("key"))
                        .unwrap();
                assert_eq!(settings.endpoint, "https://explicit.example.com");
                assert_eq!(settings.api_key, "key");
            },
        );
    }

    #[test]
    #[serial]
    fn test_env_fallback() {
        temp_env::with_vars(
            [
                (ENDPOINT_ENV, Some("https://env.example.com")),
                (API_KEY_ENV, Some("env-key")),
            ],
            || {
                let settings = ProviderSettings::resolve(None, None).unwrap();
                assert_eq!(settings.endpoint, "https://env.example.com");
                assert_eq!(settings.api_key, "env-key");
            },
        );
    }

    #[test]
    #[serial]
    fn test_missing_fields_are_reported_together() {
        temp_env::with_vars_unset([ENDPOINT_ENV, API_KEY_ENV], || {
            let err = ProviderSettings::resolve(None, None).unwrap_err();
            match err {
                ConfigError::MissingSettings(missing) => {
                    let fields: Vec<_> = missing.iter().map(|m| m.field).collect();
                    assert_eq!(fields, vec!["endpoint", "api_key"]);
                }
                other => panic!("Expected MissingSettings, got {:?}", other),
            }
        });
    }

    #[test]
    #[serial]
    fn test_explicit_empty_value_is_missing() {
        temp_env::with_var(API_KEY_ENV, Some("env-key"), || {
            let err = ProviderSettings::resolve(Some("https://n8n.local"), Some("")).unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("api_key"));
            assert!(msg.contains(API_KEY_ENV));
            assert!(!msg.contains("'endpoint'"));
        });
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let settings = ProviderSettings {
            endpoint: "https://n8n.local".into(),
            api_key: "secret".into(),
        };
        assert!(!format!("{:?}", settings).contains("secret"));
    }
}
