mod commands;
mod project;
mod utils;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "n8nform")]
#[command(about = "Declarative workflows, credentials and users for self-hosted n8n", long_about = None)]
struct Cli {
    /// Manifest to use instead of searching for n8nform.yaml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the changes apply would make
    Plan,
    /// Create, update and delete resources to match the manifest
    Apply {
        /// Apply without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Update state from n8n, dropping resources that no longer exist
    Refresh,
    /// Delete every resource in state
    Destroy {
        /// Destroy without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Bring an existing n8n object under management
    Import {
        /// Resource address, e.g. n8n_workflow.nightly
        address: String,
        /// n8n id of the object
        id: String,
    },
    /// Evaluate the data sources declared in the manifest
    Data,
    /// Print resource and data source schemas
    Schema {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect local state
    State {
        #[command(subcommand)]
        command: StateCommands,
    },
    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum StateCommands {
    /// List managed resource addresses
    List,
    /// Show the stored attributes of one resource
    Show {
        /// Resource address
        address: String,
    },
}

fn init_tracing(verbose: bool) {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if verbose {
        filter = filter.add_directive(tracing::Level::DEBUG.into());
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_project(config: Option<PathBuf>) -> anyhow::Result<project::Project> {
    let project = project::Project::load(config)?;
    tracing::debug!("Using manifest {}", project.manifest_path.display());
    Ok(project)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = cli.config;

    // Only Version and Schema run without a manifest
    match cli.command {
        Commands::Version => {
            println!("n8nform {}", env!("CARGO_PKG_VERSION"));
            println!(
                "provider {} {}",
                n8nform_provider::provider::TYPE_NAME,
                n8nform_provider::provider::VERSION
            );
        }
        Commands::Schema { json } => {
            commands::schema::handle(json)?;
        }
        Commands::Plan => {
            commands::plan::handle(&load_project(config)?).await?;
        }
        Commands::Apply { yes } => {
            commands::apply::handle(&load_project(config)?, yes).await?;
        }
        Commands::Refresh => {
            commands::refresh::handle(&load_project(config)?).await?;
        }
        Commands::Destroy { yes } => {
            commands::apply::handle_destroy(&load_project(config)?, yes).await?;
        }
        Commands::Import { address, id } => {
            commands::import::handle(&load_project(config)?, &address, &id).await?;
        }
        Commands::Data => {
            commands::data::handle(&load_project(config)?).await?;
        }
        Commands::State { command } => {
            let project = load_project(config)?;
            match command {
                StateCommands::List => commands::state::handle_list(&project).await?,
                StateCommands::Show { address } => {
                    commands::state::handle_show(&project, &address).await?
                }
            }
        }
    }

    Ok(())
}
