use crate::errors::{MultimodError, Result, io_error_with_path};
use crate::gomod::{MODULE_FILE_NAME, parse_module_path};
use crate::manifest::ModulePath;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Module path to the location of the `go.mod` declaring it.
pub type ModulePathMap = BTreeMap<ModulePath, PathBuf>;

/// Find every `go.mod` below `repo_root`, skipping hidden directories.
///
/// Symlinked directories are not followed.
pub fn find_module_files(repo_root: &Path) -> Result<Vec<PathBuf>> {
    let escaped_root = glob::Pattern::escape(&repo_root.to_string_lossy());
    let pattern = format!("{escaped_root}/**/{MODULE_FILE_NAME}");
    let options = glob::MatchOptions {
        require_literal_leading_dot: true,
        ..glob::MatchOptions::new()
    };

    let entries = glob::glob_with(&pattern, options).map_err(|e| {
        MultimodError::Config(format!("invalid search pattern '{pattern}': {e}"))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) if under_symlinked_dir(repo_root, e.path()) => {
                tracing::debug!("skipping {}: {}", e.path().display(), e.error());
                continue;
            }
            Err(e) => return Err(MultimodError::Io(e.into_error())),
        };
        if path.is_file() && !under_symlinked_dir(repo_root, &path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Whether a directory between `root` and `path` is a symlink.
fn under_symlinked_dir(root: &Path, path: &Path) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    relative
        .parent()
        .into_iter()
        .flat_map(Path::ancestors)
        .filter(|dir| !dir.as_os_str().is_empty())
        .any(|dir| {
            fs::symlink_metadata(root.join(dir))
                .map(|meta| meta.file_type().is_symlink())
                .unwrap_or(false)
        })
}

/// Map every module found under `repo_root` to its `go.mod`, leaving out `excluded` ones.
pub fn build_module_path_map(
    repo_root: &Path,
    excluded: &[ModulePath],
) -> Result<ModulePathMap> {
    let mut map = ModulePathMap::new();

    for file in find_module_files(repo_root)? {
        let text = fs::read_to_string(&file).map_err(|e| io_error_with_path(e, &file))?;
        let module = parse_module_path(&text).ok_or_else(|| MultimodError::InvalidModuleFile {
            path: file.clone(),
            message: "missing module directive".to_string(),
        })?;

        if excluded.contains(&module) {
            tracing::debug!("skipping excluded module {module}");
            continue;
        }

        if let Some(first) = map.get(&module) {
            return Err(MultimodError::DuplicateModuleFile {
                module,
                first: first.clone(),
                second: file,
            });
        }
        map.insert(module, file);
    }

    Ok(map)
}
