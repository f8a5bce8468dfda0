use crate::project::Project;
use colored::Colorize;
use n8nform_provider::Engine;

pub async fn handle(project: &Project, address: &str, id: &str) -> anyhow::Result<()> {
    println!(
        "{} {} as {}",
        "Importing".blue().bold(),
        id.cyan(),
        address.cyan()
    );

    if !project
        .manifest
        .resources
        .iter()
        .any(|d| d.address() == address)
    {
        println!(
            "{}",
            format!(
                "note: {} is not declared in the manifest; the next apply will delete it",
                address
            )
            .yellow()
        );
    }

    let provider = project.provider()?;
    let manager = project.state_manager();
    let lock = manager.acquire_lock().await?;
    let mut state = manager.load().await?;

    let diagnostics = Engine::new(&provider).import(address, id, &mut state).await?;
    manager.save(&state).await?;
    lock.release().await?;

    for diagnostic in diagnostics {
        println!("  {} {}", "warning".yellow().bold(), diagnostic);
    }
    println!("{} {}", "✓ Imported".green(), address);
    Ok(())
}
