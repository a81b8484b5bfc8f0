use crate::errors::{MultimodError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Identifier declared by a module's `module` directive (e.g. `go.opentelemetry.io/otel`).
pub type ModulePath = String;

/// Module sets keyed by their name.
pub type ModuleSetMap = BTreeMap<String, ModuleSet>;

/// A named group of modules released together under one version.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModuleSet {
    pub version: String,
    pub modules: Vec<ModulePath>,
}

/// Parsed contents of a versioning file such as `versions.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VersioningFile {
    pub module_sets: ModuleSetMap,
    #[serde(default)]
    pub excluded_modules: Vec<ModulePath>,
}

impl VersioningFile {
    /// Read and validate a versioning file.
    ///
    /// Missing and malformed files both surface as [`MultimodError::Parse`].
    /// Every module set version must be a `v`-prefixed semantic version.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| MultimodError::parse(path, e))?;
        let parsed: Self =
            serde_yaml::from_str(&text).map_err(|e| MultimodError::parse(path, e))?;

        for (name, set) in &parsed.module_sets {
            parse_module_version(&set.version).map_err(|message| {
                MultimodError::InvalidVersion {
                    module_set: name.clone(),
                    version: set.version.clone(),
                    message,
                }
            })?;
        }

        Ok(parsed)
    }

    /// Look up a module set by name.
    pub fn module_set(&self, name: &str) -> Result<&ModuleSet> {
        self.module_sets
            .get(name)
            .ok_or_else(|| MultimodError::ModuleSetNotFound(name.to_string()))
    }

    /// All module set names in sorted order.
    pub fn module_set_names(&self) -> Vec<String> {
        self.module_sets.keys().cloned().collect()
    }
}

/// Resolve the module sets a command should act on.
///
/// `all` selects every set in name order; otherwise each requested name must
/// exist. Selecting nothing is a configuration error.
pub fn select_module_sets(
    module_sets: &ModuleSetMap,
    requested: &[String],
    all: bool,
) -> Result<Vec<String>> {
    if all {
        return Ok(module_sets.keys().cloned().collect());
    }
    if requested.is_empty() {
        return Err(MultimodError::Config(
            "no module sets selected; pass module set names or select all".to_string(),
        ));
    }

    let mut selected: Vec<String> = Vec::with_capacity(requested.len());
    for name in requested {
        if !module_sets.contains_key(name) {
            return Err(MultimodError::ModuleSetNotFound(name.clone()));
        }
        if !selected.contains(name) {
            selected.push(name.clone());
        }
    }
    Ok(selected)
}

/// Parse a Go-style module version (`v1.2.3`, `v1.2.3-rc.1+meta`).
pub fn parse_module_version(version: &str) -> std::result::Result<semver::Version, String> {
    let Some(stripped) = version.strip_prefix('v') else {
        return Err("version must start with 'v'".to_string());
    };
    semver::Version::parse(stripped).map_err(|e| e.to_string())
}
