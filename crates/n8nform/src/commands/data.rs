use crate::project::Project;
use colored::Colorize;
use n8nform_provider::Engine;

pub async fn handle(project: &Project) -> anyhow::Result<()> {
    if project.manifest.data.is_empty() {
        println!("{}", "No data sources declared.".yellow());
        return Ok(());
    }

    let provider = project.provider()?;
    let results = Engine::new(&provider)
        .read_data(&project.manifest.data)
        .await?;

    for (address, value) in results {
        println!("{}", address.cyan().bold());
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
