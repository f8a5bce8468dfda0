use crate::project::Project;
use crate::utils;
use colored::Colorize;
use n8nform_provider::{Engine, Plan};

pub async fn handle(project: &Project, yes: bool) -> anyhow::Result<()> {
    println!("{}", "Applying manifest...".blue().bold());
    println!("Manifest: {}", project.manifest_path.display().to_string().cyan());

    let provider = project.provider()?;
    let manager = project.state_manager();
    let lock = manager.acquire_lock().await?;
    let mut state = manager.load().await?;

    let engine = Engine::new(&provider);
    let plan = engine.plan(&project.manifest.resources, &state)?;
    println!();
    utils::print_plan(&plan);

    if !confirmed(&plan, yes) {
        lock.release().await?;
        return Ok(());
    }

    println!();
    let result = engine.apply(&plan, &mut state).await;
    manager.save(&state).await?;
    lock.release().await?;

    utils::print_result(&result)
}

pub async fn handle_destroy(project: &Project, yes: bool) -> anyhow::Result<()> {
    println!("{}", "Destroying managed resources...".red().bold());

    let provider = project.provider()?;
    let manager = project.state_manager();
    let lock = manager.acquire_lock().await?;
    let mut state = manager.load().await?;

    let engine = Engine::new(&provider);
    let plan = engine.plan_destroy(&state);
    println!();
    utils::print_plan(&plan);

    if !confirmed(&plan, yes) {
        lock.release().await?;
        return Ok(());
    }

    println!();
    let result = engine.apply(&plan, &mut state).await;
    manager.save(&state).await?;
    lock.release().await?;

    utils::print_result(&result)
}

/// Changes only run with `--yes`
fn confirmed(plan: &Plan, yes: bool) -> bool {
    if !plan.has_changes {
        return false;
    }
    if !yes {
        println!();
        println!("{}", "Nothing was changed.".yellow());
        println!("Run again with --yes to apply these actions");
        return false;
    }
    true
}
