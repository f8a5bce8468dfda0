use colored::Colorize;
use n8nform_provider::{Action, ActionType, ApplyResult, Plan, Schema, Severity};
use serde_json::Value;

/// Replace sensitive attribute values before printing
pub fn mask_sensitive(schema: Option<&Schema>, attributes: &Value) -> Value {
    let (Some(schema), Value::Object(object)) = (schema, attributes) else {
        return attributes.clone();
    };
    Value::Object(
        object
            .iter()
            .map(|(name, value)| {
                let sensitive = schema.attribute(name).is_some_and(|a| a.sensitive);
                if sensitive && !value.is_null() {
                    (name.clone(), Value::String("(sensitive)".to_string()))
                } else {
                    (name.clone(), value.clone())
                }
            })
            .collect(),
    )
}

pub fn schema_for(type_name: &str) -> Option<Schema> {
    n8nform_provider::schemas().resources.remove(type_name)
}

fn symbol(action_type: ActionType) -> colored::ColoredString {
    match action_type {
        ActionType::Create => "+".green().bold(),
        ActionType::Update => "~".yellow().bold(),
        ActionType::Replace => "-/+".red().bold(),
        ActionType::Delete => "-".red().bold(),
        ActionType::NoOp => " ".normal(),
    }
}

fn print_action(action: &Action) {
    println!("  {} {}", symbol(action.action_type), action.description());
    if action.action_type == ActionType::NoOp {
        return;
    }
    let schema = schema_for(&action.resource_type);
    let null = Value::Null;
    let masked_prior = action
        .prior
        .as_ref()
        .map(|p| mask_sensitive(schema.as_ref(), p));
    let masked_planned = action
        .planned
        .as_ref()
        .map(|p| mask_sensitive(schema.as_ref(), p));

    // Creates have no prior to diff against
    let names: Vec<String> = match (action.action_type, &masked_planned) {
        (ActionType::Create, Some(Value::Object(planned))) => planned
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, _)| k.clone())
            .collect(),
        _ => action.changes.clone(),
    };
    for name in &names {
        let before = masked_prior.as_ref().and_then(|p| p.get(name)).unwrap_or(&null);
        let after = masked_planned
            .as_ref()
            .and_then(|p| p.get(name))
            .unwrap_or(&null);
        println!(
            "      {}: {} → {}",
            name.cyan(),
            truncate(before),
            truncate(after)
        );
    }
}

fn truncate(value: &Value) -> String {
    const LIMIT: usize = 60;
    let text = value.to_string();
    if text.chars().count() > LIMIT {
        format!("{}…", text.chars().take(LIMIT).collect::<String>())
    } else {
        text
    }
}

pub fn print_plan(plan: &Plan) {
    if !plan.has_changes {
        println!("{}", "No changes. n8n matches the manifest.".green());
        return;
    }
    println!("{}", "Planned actions:".bold());
    for action in plan
        .actions
        .iter()
        .filter(|a| a.action_type != ActionType::NoOp)
    {
        print_action(action);
    }
    println!();
    println!("Plan: {}", plan.summary().to_string().bold());
}

/// Print an apply or refresh result. Returns an error when anything failed.
pub fn print_result(result: &ApplyResult) -> anyhow::Result<()> {
    for success in &result.succeeded {
        println!(
            "  {} {}: {}",
            "✓".green(),
            success.address.cyan(),
            success.message
        );
    }
    for entry in &result.diagnostics {
        let label = match entry.diagnostic.severity {
            Severity::Warning => "warning".yellow().bold(),
            Severity::Error => "error".red().bold(),
        };
        println!(
            "  {} {}: {}",
            label,
            entry.address.cyan(),
            entry.diagnostic.summary
        );
        println!("      {}", entry.diagnostic.detail);
    }
    for failure in &result.failed {
        println!(
            "  {} {}: {}",
            "✗".red(),
            failure.address.cyan(),
            failure.error.as_deref().unwrap_or("unknown error")
        );
    }

    println!();
    println!(
        "{} succeeded, {} failed ({} ms)",
        result.succeeded.len(),
        result.failed.len(),
        result.duration_ms
    );

    if result.is_success() {
        Ok(())
    } else {
        Err(anyhow::anyhow!("{} action(s) failed", result.failed.len()))
    }
}
