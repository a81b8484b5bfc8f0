use crate::errors::{MultimodError, Result};
use crate::manifest::parse_module_version;
use crate::versioning::ModuleVersioning;
use std::path::Path;
use tracing::info;

/// Check that the versioning file covers every module in the repository and
/// that each module's major version matches its import path.
///
/// All problems are collected and returned together.
pub fn run_verify(versioning_file: &Path, repo_root: &Path) -> Result<ModuleVersioning> {
    let versioning = ModuleVersioning::load(versioning_file, repo_root)?;
    let mut problems = Vec::new();

    for (module, file) in &versioning.module_path_map {
        if !versioning.module_info_map.contains_key(module) {
            problems.push(format!(
                "module {module} ({}) is not listed in any module set and not excluded",
                file.display()
            ));
        }
    }

    for (module, info) in &versioning.module_info_map {
        let major = parse_module_version(&info.version)
            .map(|v| v.major)
            .map_err(|message| MultimodError::InvalidVersion {
                module_set: info.module_set_name.clone(),
                version: info.version.clone(),
                message,
            })?;

        match major_version_suffix(module) {
            Some(suffix) if suffix != major => problems.push(format!(
                "module {module} has major version suffix v{suffix} but module set {} is at {}",
                info.module_set_name, info.version
            )),
            None if major > 1 => problems.push(format!(
                "module {module} needs a /v{major} suffix to be released as {} in module set {}",
                info.version, info.module_set_name
            )),
            _ => {}
        }
    }

    if problems.is_empty() {
        info!(
            "{} modules in {} module sets verified",
            versioning.module_info_map.len(),
            versioning.module_set_map.len()
        );
        Ok(versioning)
    } else {
        Err(MultimodError::Verification { problems })
    }
}

/// Major version carried by a trailing `/vN` path element, for `N >= 2`.
pub fn major_version_suffix(module: &str) -> Option<u64> {
    let (_, last) = module.rsplit_once('/')?;
    let digits = last.strip_prefix('v')?;
    if digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|major| *major >= 2)
}
