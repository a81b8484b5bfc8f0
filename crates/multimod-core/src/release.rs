use crate::discovery::ModulePathMap;
use crate::errors::{MultimodError, Result};
use crate::git::{CommitHash, Repository};
use crate::manifest::{ModulePath, ModuleSet};
use crate::versioning::ModuleVersioning;
use std::path::{Component, Path};

/// Tag prefix of a module, derived from where its `go.mod` lives.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ModuleTagName {
    /// The module lives at the repository root and is tagged with the bare version.
    RepoRoot,
    /// Slash-separated directory of the module relative to the repository root.
    Path(String),
}

impl ModuleTagName {
    /// Full git tag for this module at `version`.
    pub fn full_tag_name(&self, version: &str) -> String {
        match self {
            Self::RepoRoot => version.to_string(),
            Self::Path(prefix) => format!("{prefix}/{version}"),
        }
    }
}

impl std::fmt::Display for ModuleTagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RepoRoot => f.write_str("<repo root>"),
            Self::Path(prefix) => f.write_str(prefix),
        }
    }
}

/// Compute the tag name of `module` from the location of its `go.mod`.
pub fn derive_tag_name(
    module: &str,
    path_map: &ModulePathMap,
    repo_root: &Path,
) -> Result<ModuleTagName> {
    let file = path_map
        .get(module)
        .ok_or_else(|| MultimodError::ModuleNotFound {
            module: module.to_string(),
            root: repo_root.to_path_buf(),
        })?;

    let relative = file
        .strip_prefix(repo_root)
        .map_err(|_| MultimodError::InvalidModuleFile {
            path: file.clone(),
            message: format!("not located under {}", repo_root.display()),
        })?;

    let segments: Vec<String> = relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if segments.is_empty() {
        Ok(ModuleTagName::RepoRoot)
    } else {
        Ok(ModuleTagName::Path(segments.join("/")))
    }
}

/// A [`ModuleVersioning`] narrowed to a single module set about to be released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSetRelease {
    pub versioning: ModuleVersioning,
    pub module_set_name: String,
    pub module_set: ModuleSet,
    pub tag_names: Vec<ModuleTagName>,
}

impl ModuleSetRelease {
    /// Load the versioning file under `repo_root` and select `module_set_name`.
    pub fn new(versioning_file: &Path, module_set_name: &str, repo_root: &Path) -> Result<Self> {
        let versioning = ModuleVersioning::load(versioning_file, repo_root)?;
        Self::from_versioning(versioning, module_set_name)
    }

    /// Select `module_set_name` from an already built index.
    pub fn from_versioning(versioning: ModuleVersioning, module_set_name: &str) -> Result<Self> {
        let module_set = versioning
            .module_set_map
            .get(module_set_name)
            .cloned()
            .ok_or_else(|| MultimodError::ModuleSetNotFound(module_set_name.to_string()))?;

        let tag_names = module_set
            .modules
            .iter()
            .map(|module| {
                derive_tag_name(module, &versioning.module_path_map, &versioning.repo_root)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            versioning,
            module_set_name: module_set_name.to_string(),
            module_set,
            tag_names,
        })
    }

    /// Target version of the module set.
    pub fn version(&self) -> &str {
        &self.module_set.version
    }

    /// Module paths of the set, in declaration order.
    pub fn module_paths(&self) -> &[ModulePath] {
        &self.module_set.modules
    }

    /// Full tag names for every module, in declaration order.
    pub fn full_tag_names(&self) -> Vec<String> {
        self.tag_names
            .iter()
            .map(|tag| tag.full_tag_name(self.version()))
            .collect()
    }

    /// Fail with [`MultimodError::TagExists`] when any module tag is already present.
    pub fn verify_tags_do_not_exist(&self, repo: &dyn Repository) -> Result<()> {
        let mut existing = Vec::new();
        for tag in self.full_tag_names() {
            if repo.tag_commit(&tag)?.is_some() {
                existing.push(tag);
            }
        }

        if existing.is_empty() {
            Ok(())
        } else {
            Err(MultimodError::TagExists { tags: existing })
        }
    }
}

/// What a branch-producing command did for one module set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetUpdate {
    /// Every requirement already matched; nothing was written.
    UpToDate { module_set: String },
    /// Changes were committed on `branch`.
    Committed {
        module_set: String,
        branch: String,
        commit: CommitHash,
    },
    /// Changes were left uncommitted on `branch`.
    Uncommitted { module_set: String, branch: String },
}

impl SetUpdate {
    pub fn module_set(&self) -> &str {
        match self {
            Self::UpToDate { module_set }
            | Self::Committed { module_set, .. }
            | Self::Uncommitted { module_set, .. } => module_set,
        }
    }
}

/// Branch name `<prefix>_<set>_<version>` used by sync and prerelease.
pub fn release_branch_name(prefix: &str, module_set_name: &str, version: &str) -> String {
    format!("{prefix}_{module_set_name}_{version}")
}
