//! Plan and apply declared resources against local state
//!
//! This is the smallest host that can drive the resource lifecycle: one
//! action per address, applied in order, each failure recorded without
//! stopping the rest.
//!
//! A string attribute of the exact form `${<type>.<name>.<attribute>}` is
//! replaced by that attribute from state, so an activation can point at a
//! workflow created earlier in the same apply.

use crate::action::{Action, ActionType, ApplyResult, Plan};
use crate::diagnostics::Diagnostic;
use crate::error::{FieldError, ProviderError, Result};
use crate::provider::ConfiguredProvider;
use crate::schema::Schema;
use crate::state::GlobalState;
use n8nform_config::Declaration;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

pub struct Engine<'a> {
    provider: &'a ConfiguredProvider,
}

impl<'a> Engine<'a> {
    pub fn new(provider: &'a ConfiguredProvider) -> Self {
        Self { provider }
    }

    /// Diff declared resources against state
    pub fn plan(&self, declarations: &[Declaration], state: &GlobalState) -> Result<Plan> {
        let mut actions = Vec::new();
        let mut declared = HashSet::new();

        for declaration in declarations {
            let address = declaration.address();
            let schema = self.provider.resource(&declaration.type_name)?.schema();

            let config = prepare_config(&schema, &address, &declaration.attributes, state)?;
            let prior = state.get_resource(&address).map(|r| r.attributes.clone());
            actions.push(diff(&schema, address.clone(), &declaration.type_name, config, prior));
            declared.insert(address);
        }

        for (address, resource) in &state.resources {
            if !declared.contains(address) {
                actions.push(delete_action(address, resource.resource_type.clone(), resource.attributes.clone()));
            }
        }

        Ok(Plan::new(actions))
    }

    /// A plan deleting every resource in state
    pub fn plan_destroy(&self, state: &GlobalState) -> Plan {
        Plan::new(
            state
                .resources
                .iter()
                .map(|(address, r)| delete_action(address, r.resource_type.clone(), r.attributes.clone()))
                .collect(),
        )
    }

    pub async fn apply(&self, plan: &Plan, state: &mut GlobalState) -> ApplyResult {
        let started = Instant::now();
        let mut result = ApplyResult::new();

        for action in &plan.actions {
            if action.action_type == ActionType::NoOp {
                continue;
            }
            tracing::info!("{}", action.description());
            match self.apply_action(action, state).await {
                Ok(diagnostics) => {
                    for diagnostic in &diagnostics {
                        tracing::warn!("{}: {}", action.address, diagnostic);
                    }
                    result.add_diagnostics(&action.address, diagnostics);
                    result.add_success(
                        &action.address,
                        action.action_type,
                        format!("{} complete", action.action_type),
                    );
                }
                Err(e) => {
                    tracing::error!("{}: {}", action.address, e);
                    result.add_failure(&action.address, action.action_type, e.to_string());
                }
            }
        }

        result.duration_ms = started.elapsed().as_millis() as u64;
        result
    }

    async fn apply_action(&self, action: &Action, state: &mut GlobalState) -> Result<Vec<Diagnostic>> {
        let resource = self.provider.resource(&action.resource_type)?;
        let planned = action
            .planned
            .as_ref()
            .map(|p| resolve_references(p, state));
        let prior = action.prior.clone().unwrap_or(Value::Null);

        let outcome = match (action.action_type, planned) {
            (ActionType::Delete, _) => {
                let diagnostics = resource.delete_json(prior).await?;
                state.remove_resource(&action.address);
                return Ok(diagnostics);
            }
            (ActionType::Create, Some(planned)) => resource.create_json(planned).await?,
            (ActionType::Update, Some(planned)) => resource.update_json(planned, prior).await?,
            (ActionType::Replace, Some(planned)) => {
                let mut diagnostics = resource.delete_json(prior).await?;
                state.remove_resource(&action.address);
                let mut outcome = resource.create_json(planned).await?;
                diagnostics.append(&mut outcome.diagnostics);
                outcome.diagnostics = diagnostics;
                outcome
            }
            _ => return Ok(Vec::new()),
        };

        match outcome.state {
            Some(attributes) => state.record(&action.address, &action.resource_type, attributes),
            None => {
                state.remove_resource(&action.address);
            }
        }
        Ok(outcome.diagnostics)
    }

    /// Read every stored resource back from n8n. Resources that no longer
    /// exist leave state.
    pub async fn refresh(&self, state: &mut GlobalState) -> ApplyResult {
        let started = Instant::now();
        let mut result = ApplyResult::new();
        let stored: Vec<(String, String, Value)> = state
            .resources
            .iter()
            .map(|(address, r)| (address.clone(), r.resource_type.clone(), r.attributes.clone()))
            .collect();

        for (address, resource_type, attributes) in stored {
            let outcome = match self.provider.resource(&resource_type) {
                Ok(resource) => resource.read_json(attributes).await,
                Err(e) => Err(e),
            };
            match outcome {
                Ok(outcome) => {
                    result.add_diagnostics(&address, outcome.diagnostics);
                    match outcome.state {
                        Some(attributes) => {
                            state.record(&address, &resource_type, attributes);
                            result.add_success(&address, ActionType::NoOp, "refreshed".to_string());
                        }
                        None => {
                            state.remove_resource(&address);
                            result.add_success(
                                &address,
                                ActionType::Delete,
                                "no longer exists, removed from state".to_string(),
                            );
                        }
                    }
                }
                Err(e) => result.add_failure(&address, ActionType::NoOp, e.to_string()),
            }
        }

        result.duration_ms = started.elapsed().as_millis() as u64;
        result
    }

    /// Adopt an existing remote entity under `address`
    pub async fn import(&self, address: &str, id: &str, state: &mut GlobalState) -> Result<Vec<Diagnostic>> {
        let (type_name, _) = address.split_once('.').ok_or_else(|| {
            ProviderError::field("address", format!("'{}' is not of the form <type>.<name>", address))
        })?;
        if state.get_resource(address).is_some() {
            return Err(ProviderError::State(format!(
                "{} is already managed; remove it from state before importing",
                address
            )));
        }

        let resource = self.provider.resource(type_name)?;
        let outcome = resource.read_json(resource.import_json(id)?).await?;
        let Some(attributes) = outcome.state else {
            return Err(ProviderError::NotFound {
                summary: "Cannot import non-existent remote object".to_string(),
                detail: format!("{} with id {} does not exist in n8n", type_name, id),
            });
        };

        state.record(address, type_name, attributes);
        tracing::info!("Imported {} as {}", id, address);
        Ok(outcome.diagnostics)
    }

    /// Evaluate data source declarations, keyed by `data.<type>.<name>`
    pub async fn read_data(&self, declarations: &[Declaration]) -> Result<BTreeMap<String, Value>> {
        let mut results = BTreeMap::new();
        for declaration in declarations {
            let address = format!("data.{}", declaration.address());
            let data_source = self.provider.data_source(&declaration.type_name)?;
            data_source
                .schema()
                .validate_config(&declaration.attributes)
                .map_err(|errors| scoped(&address, errors))?;
            let value = data_source.read_json(declaration.attributes.clone()).await?;
            results.insert(address, value);
        }
        Ok(results)
    }
}

fn scoped(address: &str, errors: Vec<FieldError>) -> ProviderError {
    ProviderError::Validation(
        errors
            .into_iter()
            .map(|e| FieldError::new(format!("{}.{}", address, e.field), e.message))
            .collect(),
    )
}

/// Validate, default and resolve references in one declaration
fn prepare_config(schema: &Schema, address: &str, attributes: &Value, state: &GlobalState) -> Result<Value> {
    let mut config = resolve_references(attributes, state);
    schema
        .validate_config(&config)
        .map_err(|errors| scoped(address, errors))?;
    schema.apply_defaults(&mut config);
    Ok(config)
}

fn delete_action(address: &str, resource_type: String, prior: Value) -> Action {
    Action {
        address: address.to_string(),
        action_type: ActionType::Delete,
        resource_type,
        changes: Vec::new(),
        planned: None,
        prior: Some(prior),
    }
}

fn diff(schema: &Schema, address: String, resource_type: &str, config: Value, prior: Option<Value>) -> Action {
    let null = Value::Null;
    let Some(prior) = prior else {
        return Action {
            address,
            action_type: ActionType::Create,
            resource_type: resource_type.to_string(),
            changes: Vec::new(),
            planned: Some(planned_values(schema, &config, None)),
            prior: None,
        };
    };

    let mut changes = Vec::new();
    let mut replace = false;
    for (name, attr) in &schema.attributes {
        if !attr.is_configurable() {
            continue;
        }
        let desired = config.get(*name).unwrap_or(&null);
        // Unset computed attributes keep whatever the server reported
        if desired.is_null() && attr.computed {
            continue;
        }
        let current = prior.get(*name).unwrap_or(&null);
        if !attr.values_equal(desired, current) {
            changes.push(name.to_string());
            replace |= attr.requires_replace;
        }
    }

    let action_type = match (changes.is_empty(), replace) {
        (true, _) => ActionType::NoOp,
        (false, true) => ActionType::Replace,
        (false, false) => ActionType::Update,
    };
    let planned = if action_type == ActionType::Replace {
        planned_values(schema, &config, None)
    } else {
        planned_values(schema, &config, Some(&prior))
    };

    Action {
        address,
        action_type,
        resource_type: resource_type.to_string(),
        changes,
        planned: Some(planned),
        prior: Some(prior),
    }
}

/// Configured values, with unset computed attributes carried over from state
fn planned_values(schema: &Schema, config: &Value, prior: Option<&Value>) -> Value {
    let mut planned = Map::new();
    for (name, attr) in &schema.attributes {
        let configured = config.get(*name).filter(|v| !v.is_null());
        let value = match (configured, prior) {
            (Some(value), _) if attr.is_configurable() => value.clone(),
            (_, Some(prior)) if attr.computed => prior.get(*name).cloned().unwrap_or(Value::Null),
            _ => Value::Null,
        };
        planned.insert(name.to_string(), value);
    }
    Value::Object(planned)
}

/// Replace `${type.name.attribute}` strings with values from state.
/// Unresolvable references are left untouched.
pub fn resolve_references(value: &Value, state: &GlobalState) -> Value {
    match value {
        Value::String(text) => text
            .strip_prefix("${")
            .and_then(|rest| rest.strip_suffix('}'))
            .and_then(|reference| state.lookup(reference))
            .cloned()
            .unwrap_or_else(|| value.clone()),
        Value::Object(object) => Value::Object(
            object
                .iter()
                .map(|(k, v)| (k.clone(), resolve_references(v, state)))
                .collect(),
        ),
        _ => value.clone(),
    }
}
