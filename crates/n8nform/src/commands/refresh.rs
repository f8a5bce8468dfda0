use crate::project::Project;
use crate::utils;
use colored::Colorize;
use n8nform_provider::Engine;

pub async fn handle(project: &Project) -> anyhow::Result<()> {
    println!("{}", "Refreshing state from n8n...".blue().bold());

    let provider = project.provider()?;
    let manager = project.state_manager();
    let lock = manager.acquire_lock().await?;
    let mut state = manager.load().await?;

    if state.resources.is_empty() {
        println!("{}", "State is empty, nothing to refresh.".yellow());
        lock.release().await?;
        return Ok(());
    }

    let result = Engine::new(&provider).refresh(&mut state).await;
    manager.save(&state).await?;
    lock.release().await?;

    utils::print_result(&result)
}
