use anyhow::Context;
use n8nform_config::Manifest;
use n8nform_provider::{ConfiguredProvider, N8nProvider, StateManager};
use std::path::{Path, PathBuf};

/// The manifest of a run and the directory holding its state
pub struct Project {
    pub manifest: Manifest,
    pub manifest_path: PathBuf,
    pub root: PathBuf,
}

impl Project {
    pub fn load(config: Option<PathBuf>) -> anyhow::Result<Self> {
        let manifest_path = match config {
            Some(path) => path,
            None => n8nform_config::find_manifest().context(
                "no manifest found; create n8nform.yaml or pass --config <path>",
            )?,
        };
        let manifest = Manifest::load(&manifest_path)
            .with_context(|| format!("failed to load {}", manifest_path.display()))?;

        Ok(Self {
            root: project_root(&manifest_path),
            manifest,
            manifest_path,
        })
    }

    pub fn state_manager(&self) -> StateManager {
        StateManager::new(&self.root)
    }

    /// Resolve settings and build the provider. Only commands that talk to
    /// n8n call this.
    pub fn provider(&self) -> anyhow::Result<ConfiguredProvider> {
        N8nProvider::configure_from_block(&self.manifest.provider)
            .context("failed to configure the n8n provider")
    }
}

/// State lives next to the manifest. A manifest inside `.n8nform/` belongs
/// to the directory above it.
fn project_root(manifest_path: &Path) -> PathBuf {
    let dir = manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let dir = if dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        dir
    };
    if dir.file_name().is_some_and(|name| name == ".n8nform") {
        dir.parent().map(Path::to_path_buf).unwrap_or(dir)
    } else {
        dir
    }
}
