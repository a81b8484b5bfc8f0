use crate::discovery::{ModulePathMap, build_module_path_map};
use crate::errors::{MultimodError, Result};
use crate::manifest::{ModulePath, ModuleSetMap, VersioningFile};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Which module set a module belongs to and the version it should carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub module_set_name: String,
    pub version: String,
}

pub type ModuleInfoMap = BTreeMap<ModulePath, ModuleInfo>;

/// Invert a module set map into one entry per module path.
///
/// Sets are visited in name order, so when a module is listed twice the
/// error names the alphabetically first set as `first_set`.
pub fn build_module_info_map(module_sets: &ModuleSetMap) -> Result<ModuleInfoMap> {
    let mut info_map = ModuleInfoMap::new();

    for (set_name, set) in module_sets {
        for module in &set.modules {
            if let Some(existing) = info_map.get(module) {
                return Err(MultimodError::DuplicateModule {
                    module: module.clone(),
                    first_set: existing.module_set_name.clone(),
                    second_set: set_name.clone(),
                });
            }
            info_map.insert(
                module.clone(),
                ModuleInfo {
                    module_set_name: set_name.clone(),
                    version: set.version.clone(),
                },
            );
        }
    }

    Ok(info_map)
}

/// Consistent view of one repository's versioning file and modules on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleVersioning {
    pub repo_root: PathBuf,
    pub module_set_map: ModuleSetMap,
    pub module_path_map: ModulePathMap,
    pub module_info_map: ModuleInfoMap,
    pub excluded_modules: Vec<ModulePath>,
}

impl ModuleVersioning {
    /// Load the versioning file and resolve every listed module under `repo_root`.
    pub fn load(versioning_file: &Path, repo_root: &Path) -> Result<Self> {
        let file = VersioningFile::load(versioning_file)?;
        let path_map = build_module_path_map(repo_root, &file.excluded_modules)?;
        Self::from_parts(file, path_map, repo_root)
    }

    /// Assemble the index from an already parsed file and module path map.
    pub fn from_parts(
        file: VersioningFile,
        module_path_map: ModulePathMap,
        repo_root: &Path,
    ) -> Result<Self> {
        let module_info_map = build_module_info_map(&file.module_sets)?;

        for (module, info) in &module_info_map {
            if file.excluded_modules.contains(module) {
                return Err(MultimodError::ExcludedModuleInSet {
                    module: module.clone(),
                    module_set: info.module_set_name.clone(),
                });
            }
            if !module_path_map.contains_key(module) {
                return Err(MultimodError::ModuleNotFound {
                    module: module.clone(),
                    root: repo_root.to_path_buf(),
                });
            }
        }

        Ok(Self {
            repo_root: repo_root.to_path_buf(),
            module_set_map: file.module_sets,
            module_path_map,
            module_info_map,
            excluded_modules: file.excluded_modules,
        })
    }

    /// Module set names in sorted order.
    pub fn module_set_names(&self) -> Vec<String> {
        self.module_set_map.keys().cloned().collect()
    }

    /// Locations of every module file in the repository.
    pub fn module_files(&self) -> impl Iterator<Item = &Path> {
        self.module_path_map.values().map(PathBuf::as_path)
    }
}
