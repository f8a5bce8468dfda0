//! Attribute schemas for resources, data sources and the provider block

use crate::error::FieldError;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
    /// A string holding a JSON document; compared by value, not by text
    Json,
}

#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub description: &'static str,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    /// Changing the value destroys and recreates the remote entity
    pub requires_replace: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl Attribute {
    fn base(attr_type: AttributeType, description: &'static str) -> Self {
        Self {
            attr_type,
            description,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            requires_replace: false,
            default: None,
        }
    }

    pub fn required(attr_type: AttributeType, description: &'static str) -> Self {
        Self {
            required: true,
            ..Self::base(attr_type, description)
        }
    }

    pub fn optional(attr_type: AttributeType, description: &'static str) -> Self {
        Self {
            optional: true,
            ..Self::base(attr_type, description)
        }
    }

    pub fn computed(attr_type: AttributeType, description: &'static str) -> Self {
        Self {
            computed: true,
            ..Self::base(attr_type, description)
        }
    }

    /// Optional in configuration, filled in by the provider when absent
    pub fn optional_computed(attr_type: AttributeType, description: &'static str) -> Self {
        Self {
            optional: true,
            computed: true,
            ..Self::base(attr_type, description)
        }
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Whether the attribute may appear in configuration
    pub fn is_configurable(&self) -> bool {
        self.required || self.optional
    }

    fn type_matches(&self, value: &Value) -> bool {
        match self.attr_type {
            AttributeType::String | AttributeType::Json => value.is_string(),
            AttributeType::Bool => value.is_boolean(),
        }
    }

    /// Semantic equality: JSON attributes compare parsed documents
    pub fn values_equal(&self, a: &Value, b: &Value) -> bool {
        if a == b {
            return true;
        }
        if self.attr_type != AttributeType::Json {
            return false;
        }
        match (a.as_str(), b.as_str()) {
            (Some(a), Some(b)) => match (
                serde_json::from_str::<Value>(a),
                serde_json::from_str::<Value>(b),
            ) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            },
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    pub fn new(description: &'static str) -> Self {
        Self {
            description,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.attributes.insert(name, attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Check a configuration object against the schema, reporting every problem.
    pub fn validate_config(&self, config: &Value) -> Result<(), Vec<FieldError>> {
        let Some(object) = config.as_object() else {
            return Err(vec![FieldError::new("(root)", "attributes must be an object")]);
        };

        let mut errors = Vec::new();

        for key in object.keys() {
            match self.attributes.get(key.as_str()) {
                None => errors.push(FieldError::new(key, "unsupported attribute")),
                Some(attr) if !attr.is_configurable() && !object[key].is_null() => {
                    errors.push(FieldError::new(key, "attribute is computed and cannot be set"))
                }
                _ => {}
            }
        }

        for (name, attr) in &self.attributes {
            match object.get(*name) {
                None | Some(Value::Null) => {
                    if attr.required {
                        errors.push(FieldError::new(*name, "required attribute is missing"));
                    }
                }
                Some(value) if attr.is_configurable() && !attr.type_matches(value) => {
                    errors.push(FieldError::new(
                        *name,
                        format!("expected a {:?} value", attr.attr_type).to_lowercase(),
                    ));
                }
                _ => {}
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Fill in defaults for configurable attributes left unset
    pub fn apply_defaults(&self, config: &mut Value) {
        let Some(object) = config.as_object_mut() else {
            return;
        };
        for (name, attr) in &self.attributes {
            if let Some(default) = &attr.default {
                let entry = object.entry(name.to_string()).or_insert(Value::Null);
                if entry.is_null() {
                    *entry = default.clone();
                }
            }
        }
    }
}
