pub mod error;
pub mod manifest;
pub mod settings;

pub use error::*;
pub use manifest::{Declaration, Manifest};
pub use settings::{API_KEY_ENV, ENDPOINT_ENV, ProviderBlock, ProviderSettings};

use std::path::PathBuf;

/// Environment variable pointing directly at a manifest
pub const CONFIG_PATH_ENV: &str = "N8NFORM_CONFIG_PATH";

const CANDIDATES: [&str; 2] = ["n8nform.local.yaml", "n8nform.yaml"];

/// n8nform's global config directory (`~/.config/n8nform`)
pub fn get_config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("n8nform"))
}

/// Locate the project manifest
///
/// Search order:
/// 1. `N8NFORM_CONFIG_PATH` (direct path)
/// 2. current directory: n8nform.local.yaml, n8nform.yaml
/// 3. `./.n8nform/`: same order
/// 4. `~/.config/n8nform/n8nform.yaml` (global)
pub fn find_manifest() -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!(
            "{} points at a missing file: {}",
            CONFIG_PATH_ENV,
            path.display()
        );
    }

    let current_dir = std::env::current_dir()?;

    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    let project_dir = current_dir.join(".n8nform");
    if project_dir.is_dir() {
        for filename in &CANDIDATES {
            let path = project_dir.join(filename);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    if let Ok(config_dir) = get_config_dir() {
        let global = config_dir.join("n8nform.yaml");
        if global.exists() {
            return Ok(global);
        }
    }

    Err(ConfigError::ManifestNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    /// Restores the working directory even when a test panics
    struct CwdGuard(PathBuf);

    impl Drop for CwdGuard {
        fn drop(&mut self) {
            let _ = std::env::set_current_dir(&self.0);
        }
    }

    fn in_dir<F: FnOnce()>(dir: &std::path::Path, f: F) {
        let _guard = CwdGuard(std::env::current_dir().unwrap());
        std::env::set_current_dir(dir).unwrap();
        temp_env::with_var_unset(CONFIG_PATH_ENV, f);
    }

    #[test]
    #[serial]
    fn test_in_dir_restores_cwd_after_panic() {
        let original = std::env::current_dir().unwrap();
        let temp_dir = tempfile::tempdir().unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            in_dir(temp_dir.path(), || panic!("failing test body"));
        }));

        assert!(result.is_err());
        assert_eq!(std::env::current_dir().unwrap(), original);
    }

    #[test]
    fn test_get_config_dir() {
        if let Ok(dir) = get_config_dir() {
            assert!(dir.ends_with("n8nform"));
        }
    }

    #[test]
    #[serial]
    fn test_find_manifest_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("n8nform.yaml"), "resources: []").unwrap();

        in_dir(temp_dir.path(), || {
            let found = find_manifest().unwrap();
            assert!(found.ends_with("n8nform.yaml"));
        });
    }

    #[test]
    #[serial]
    fn test_local_manifest_has_priority() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("n8nform.yaml"), "# shared").unwrap();
        fs::write(temp_dir.path().join("n8nform.local.yaml"), "# local").unwrap();

        in_dir(temp_dir.path(), || {
            assert!(find_manifest().unwrap().ends_with("n8nform.local.yaml"));
        });
    }

    #[test]
    #[serial]
    fn test_find_manifest_in_project_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project_dir = temp_dir.path().join(".n8nform");
        fs::create_dir(&project_dir).unwrap();
        fs::write(project_dir.join("n8nform.yaml"), "# nested").unwrap();

        in_dir(temp_dir.path(), || {
            assert!(find_manifest().unwrap().ends_with(".n8nform/n8nform.yaml"));
        });
    }

    #[test]
    #[serial]
    fn test_find_manifest_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manifest = temp_dir.path().join("custom.yaml");
        fs::write(&manifest, "# custom").unwrap();

        temp_env::with_var(CONFIG_PATH_ENV, Some(manifest.as_os_str()), || {
            assert_eq!(find_manifest().unwrap(), manifest);
        });
    }
}
