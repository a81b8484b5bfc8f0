use crate::errors::MultimodError;
use std::path::{Path, PathBuf};

/// Directory holding repository-level multimod settings.
pub const CONFIG_DIR: &str = ".multimod";

/// Repository defaults loaded from `.multimod/config.toml`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Versioning file, relative to the repository root unless absolute.
    pub versioning_file: PathBuf,
    /// `make` targets run by prerelease before committing.
    pub make_targets: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            versioning_file: PathBuf::from("versions.yaml"),
            make_targets: vec!["lint".to_string(), "ci".to_string()],
        }
    }
}

impl Config {
    /// Load configuration from `.multimod/config.toml`, falling back to defaults.
    pub fn load(root: &Path) -> Result<Self, MultimodError> {
        let path = root.join(CONFIG_DIR).join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)?;
        let value: toml::Value = text
            .parse()
            .map_err(|e| MultimodError::Config(format!("invalid config.toml: {e}")))?;

        let defaults = Self::default();

        let versioning_file = match value.get("versioning_file") {
            None => defaults.versioning_file,
            Some(v) => v.as_str().map(PathBuf::from).ok_or_else(|| {
                MultimodError::Config("versioning_file must be a string".to_string())
            })?,
        };

        let make_targets = match value
            .get("prerelease")
            .and_then(|v| v.as_table())
            .and_then(|t| t.get("make_targets"))
        {
            None => defaults.make_targets,
            Some(v) => v
                .as_array()
                .and_then(|items| {
                    items
                        .iter()
                        .map(|item| item.as_str().map(str::to_string))
                        .collect::<Option<Vec<_>>>()
                })
                .ok_or_else(|| {
                    MultimodError::Config(
                        "prerelease.make_targets must be an array of strings".to_string(),
                    )
                })?,
        };

        Ok(Self {
            versioning_file,
            make_targets,
        })
    }

    /// Absolute location of the versioning file for a repository rooted at `root`.
    pub fn versioning_file_in(&self, root: &Path) -> PathBuf {
        if self.versioning_file.is_absolute() {
            self.versioning_file.clone()
        } else {
            root.join(&self.versioning_file)
        }
    }
}
