//! Workflow definitions from either a complete export or individual attributes
//!
//! A workflow can be declared with `workflow_json` (an export from the n8n
//! editor, pasted as is) or with `name`, `nodes`, `connections` and the
//! optional `settings` and `tags`. When the document is present it wins:
//! its values replace whatever individual attributes were also given.

use super::workflow::WorkflowModel;
use crate::error::{FieldError, ProviderError, Result};
use crate::resource::to_json_string;
use n8nform_client::{JsonObject, Tag, Workflow};
use serde_json::Value;

const DOCUMENT_FIELD: &str = "workflow_json";

/// The typed contents of a `workflow_json` document
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowDocument {
    pub name: String,
    /// Parsed for completeness only. Activation is owned by the
    /// `n8n_workflow_activation` resource and this flag is never sent.
    pub active: bool,
    pub nodes: Vec<Value>,
    pub connections: JsonObject,
    pub settings: Option<JsonObject>,
    pub tags: Option<Vec<Tag>>,
}

impl WorkflowDocument {
    /// Decode an exported workflow, reporting every missing or mistyped
    /// required field at once.
    pub fn parse(text: &str) -> std::result::Result<Self, Vec<FieldError>> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            vec![FieldError::new(
                DOCUMENT_FIELD,
                format!("Could not parse workflow_json: {}", e),
            )]
        })?;
        let Value::Object(mut object) = value else {
            return Err(vec![FieldError::new(
                DOCUMENT_FIELD,
                "workflow_json must be a JSON object",
            )]);
        };

        let mut errors = Vec::new();

        let name = match object.remove("name") {
            Some(Value::String(name)) => Some(name),
            _ => {
                errors.push(missing("workflow_json must contain a 'name' field"));
                None
            }
        };
        let nodes = match object.remove("nodes") {
            Some(Value::Array(nodes)) => Some(nodes),
            _ => {
                errors.push(missing("workflow_json must contain a 'nodes' array"));
                None
            }
        };
        let connections = match object.remove("connections") {
            Some(Value::Object(connections)) => Some(connections),
            _ => {
                errors.push(missing("workflow_json must contain a 'connections' object"));
                None
            }
        };

        let (Some(name), Some(nodes), Some(connections)) = (name, nodes, connections) else {
            return Err(errors);
        };

        let active = object.get("active").and_then(Value::as_bool).unwrap_or(false);
        let settings = match object.remove("settings") {
            Some(Value::Object(settings)) => Some(settings),
            _ => None,
        };
        let tags = match object.remove("tags") {
            Some(Value::Array(tags)) => Some(tags.iter().filter_map(tag_from_value).collect()),
            _ => None,
        };

        Ok(Self {
            name,
            active,
            nodes,
            connections,
            settings,
            tags,
        })
    }
}

fn missing(message: &str) -> FieldError {
    FieldError::new(DOCUMENT_FIELD, message)
}

/// Exported tags carry extra fields (`createdAt`, ...); only the string
/// `id` and `name` survive. Non-object entries are skipped.
fn tag_from_value(value: &Value) -> Option<Tag> {
    let object = value.as_object()?;
    let text = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    Some(Tag::new(text("id"), text("name")))
}

/// A workflow ready to be written to n8n
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowDefinition {
    pub name: String,
    pub active: bool,
    pub nodes: Vec<Value>,
    pub connections: JsonObject,
    pub settings: Option<JsonObject>,
    pub tags: Option<Vec<Tag>>,
    /// Whether the values came from `workflow_json`
    pub from_document: bool,
}

impl WorkflowDefinition {
    pub fn resolve(model: &WorkflowModel) -> Result<Self> {
        match model.workflow_json.as_deref() {
            Some(text) if !text.is_empty() => {
                let document = WorkflowDocument::parse(text).map_err(ProviderError::Validation)?;
                Ok(Self {
                    name: document.name,
                    active: document.active,
                    nodes: document.nodes,
                    connections: document.connections,
                    settings: document.settings,
                    tags: document.tags,
                    from_document: true,
                })
            }
            _ => Self::from_attributes(model),
        }
    }

    fn from_attributes(model: &WorkflowModel) -> Result<Self> {
        let mut errors = Vec::new();

        if model.name.is_none() || model.nodes.is_none() || model.connections.is_none() {
            for (field, value) in [
                ("name", &model.name),
                ("nodes", &model.nodes),
                ("connections", &model.connections),
            ] {
                if value.is_none() {
                    errors.push(FieldError::new(
                        field,
                        "Either workflow_json or all of (name, nodes, connections) must be provided",
                    ));
                }
            }
        }

        let nodes = parse_field::<Vec<Value>>("nodes", model.nodes.as_deref(), &mut errors);
        let connections =
            parse_field::<JsonObject>("connections", model.connections.as_deref(), &mut errors);
        let settings = parse_field::<JsonObject>(
            "settings",
            model.settings.as_deref().filter(|s| !s.is_empty()),
            &mut errors,
        );
        let tags = parse_field::<Vec<Tag>>(
            "tags",
            model.tags.as_deref().filter(|s| !s.is_empty()),
            &mut errors,
        );

        if !errors.is_empty() {
            return Err(ProviderError::Validation(errors));
        }

        Ok(Self {
            name: model.name.clone().unwrap_or_default(),
            active: false,
            nodes: nodes.unwrap_or_default(),
            connections: connections.unwrap_or_default(),
            settings,
            tags,
            from_document: false,
        })
    }

    /// Overwrite the model's individual attributes with the document's values
    pub fn write_back(&self, model: &mut WorkflowModel) -> Result<()> {
        model.name = Some(self.name.clone());
        model.nodes = Some(to_json_string("nodes", &self.nodes)?);
        model.connections = Some(to_json_string("connections", &self.connections)?);
        if let Some(settings) = &self.settings {
            model.settings = Some(to_json_string("settings", settings)?);
        }
        if let Some(tags) = &self.tags {
            model.tags = Some(to_json_string("tags", tags)?);
        }
        Ok(())
    }

    pub fn to_workflow(&self) -> Workflow {
        Workflow {
            name: self.name.clone(),
            nodes: self.nodes.clone(),
            connections: self.connections.clone(),
            settings: self.settings.clone(),
            tags: self.tags.clone().unwrap_or_default(),
            ..Default::default()
        }
    }
}

fn parse_field<T: serde::de::DeserializeOwned>(
    field: &str,
    text: Option<&str>,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let text = text?;
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(FieldError::new(
                field,
                format!("Could not parse {} JSON: {}", field, e),
            ));
            None
        }
    }
}
