//! Entity types exchanged with the n8n public API

use serde::{Deserialize, Deserializer, Serialize};

/// JSON object as stored by n8n (connections, settings, credential data)
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// n8n sends `null` for empty collections and unset strings
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// An n8n workflow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub active: bool,

    /// Node definitions, opaque to this client
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<serde_json::Value>,

    /// Connection graph keyed by source node name
    #[serde(default, deserialize_with = "null_as_default")]
    pub connections: JsonObject,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<JsonObject>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<Tag>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub created_at: String,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub updated_at: String,
}

/// A tag reference. Tags are never created by this client, only assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,
}

impl Tag {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Tag assignment is only attempted when at least one tag carries an id.
/// Exports from the n8n editor often contain `"tags": []` or name-only tags.
pub fn tags_have_ids(tags: &[Tag]) -> bool {
    tags.iter().any(Tag::has_id)
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct ListResponse<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<T>,
}

/// An n8n credential. `data` is write-only: the API never returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,

    pub name: String,

    #[serde(rename = "type")]
    pub credential_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonObject>,
}

/// An n8n user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub role: String,

    /// Older n8n releases report the role here instead of `role`
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub global_role: String,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub created_at: String,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub updated_at: String,

    /// Only present in the creation response
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub invite_accept_url: String,

    #[serde(default)]
    pub is_owner: bool,

    #[serde(default)]
    pub is_pending: bool,
}

impl User {
    /// The effective role, falling back to `globalRole`
    pub fn role(&self) -> &str {
        if self.role.is_empty() {
            &self.global_role
        } else {
            &self.role
        }
    }

    pub fn set_role(&mut self, role: impl Into<String>) {
        let role = role.into();
        self.global_role = role.clone();
        self.role = role;
    }
}

/// One element of the bulk user creation request
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest {
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub role: String,
}

/// One element of the bulk user creation response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserResult {
    #[serde(default)]
    pub user: CreatedUser,
    #[serde(default)]
    pub error: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub invite_accept_url: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub email_sent: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateRoleRequest<'a> {
    pub new_role_name: &'a str,
}
