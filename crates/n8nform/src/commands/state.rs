use crate::project::Project;
use crate::utils;
use colored::Colorize;

pub async fn handle_list(project: &Project) -> anyhow::Result<()> {
    let state = project.state_manager().load().await?;
    if state.resources.is_empty() {
        println!("{}", "No resources in state.".yellow());
        return Ok(());
    }
    for (address, resource) in &state.resources {
        println!(
            "{}  {}",
            address.cyan(),
            resource.id().unwrap_or("-")
        );
    }
    Ok(())
}

pub async fn handle_show(project: &Project, address: &str) -> anyhow::Result<()> {
    let state = project.state_manager().load().await?;
    let resource = state
        .get_resource(address)
        .ok_or_else(|| anyhow::anyhow!("{} is not in state", address))?;

    let schema = utils::schema_for(&resource.resource_type);
    let attributes = utils::mask_sensitive(schema.as_ref(), &resource.attributes);

    println!("{}", address.bold());
    println!("  type:       {}", resource.resource_type);
    println!("  created at: {}", resource.created_at);
    println!("  updated at: {}", resource.updated_at);
    println!("{}", serde_json::to_string_pretty(&attributes)?);
    Ok(())
}
