use crate::project::Project;
use crate::utils;
use colored::Colorize;
use n8nform_provider::Engine;

pub async fn handle(project: &Project) -> anyhow::Result<()> {
    println!("{}", "Planning...".blue().bold());
    println!("Manifest: {}", project.manifest_path.display().to_string().cyan());

    let provider = project.provider()?;
    let state = project.state_manager().load().await?;

    let plan = Engine::new(&provider).plan(&project.manifest.resources, &state)?;
    println!();
    utils::print_plan(&plan);
    Ok(())
}
