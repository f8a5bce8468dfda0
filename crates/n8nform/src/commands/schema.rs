use colored::Colorize;
use n8nform_provider::Schema;

pub fn handle(json: bool) -> anyhow::Result<()> {
    let schemas = n8nform_provider::schemas();
    if json {
        println!("{}", serde_json::to_string_pretty(&schemas)?);
        return Ok(());
    }

    print_schema("provider n8n", &schemas.provider);
    for (name, schema) in &schemas.resources {
        print_schema(&format!("resource {}", name), schema);
    }
    for (name, schema) in &schemas.data_sources {
        print_schema(&format!("data {}", name), schema);
    }
    Ok(())
}

fn print_schema(title: &str, schema: &Schema) {
    println!("{}", title.bold());
    println!("  {}", schema.description);
    for (name, attr) in &schema.attributes {
        let mut flags = Vec::new();
        if attr.required {
            flags.push("required");
        }
        if attr.optional {
            flags.push("optional");
        }
        if attr.computed {
            flags.push("computed");
        }
        if attr.sensitive {
            flags.push("sensitive");
        }
        if attr.requires_replace {
            flags.push("forces replacement");
        }
        println!(
            "    {} ({}) {}",
            name.cyan(),
            flags.join(", "),
            attr.description
        );
    }
    println!();
}
