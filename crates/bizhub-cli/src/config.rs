//! CLI configuration file resolution

use std::path::{Path, PathBuf};

use anyhow::Context;
use bizhub_forms::FormsConfig;

/// `~/.bizhub/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".bizhub").join("config.toml"))
}

/// Load from `--config` if given, else the default location. Missing files give defaults.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<FormsConfig> {
    match explicit.map(Path::to_path_buf).or_else(default_path) {
        Some(path) => FormsConfig::load(&path).with_context(|| format!("loading {}", path.display())),
        None => {
            tracing::warn!("cannot find home directory, using default configuration");
            Ok(FormsConfig::default().with_overrides(|key| std::env::var(key).ok()))
        }
    }
}

/// Write the defaults, refusing to overwrite an existing file
pub fn init(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(default_path)
        .context("cannot find home directory")?;
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, FormsConfig::default().to_toml()?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert_eq!(init(Some(&path)).unwrap(), path);
        assert!(init(Some(&path)).is_err());

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.import.batch_size, FormsConfig::default().import.batch_size);
    }

    #[test]
    fn test_default_path_is_under_home() {
        if let Some(path) = default_path() {
            assert!(path.ends_with(".bizhub/config.toml"));
        }
    }
}
