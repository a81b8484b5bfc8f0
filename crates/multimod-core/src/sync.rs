use crate::errors::{MultimodError, Result};
use crate::git::{Repository, switch_to_new_branch, verify_working_tree_clean};
use crate::gomod::update_module_files;
use crate::manifest::{VersioningFile, select_module_sets};
use crate::process;
use crate::release::{SetUpdate, release_branch_name};
use crate::versioning::ModuleVersioning;
use std::path::PathBuf;
use tracing::{info, warn};

/// Inputs of the `sync` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Versioning file of the repository being updated.
    pub versioning_file: PathBuf,
    /// Versioning file of the repository whose module sets are adopted.
    pub other_versioning_file: PathBuf,
    /// Checkout of the other repository; when set its versioning file is
    /// validated against the modules found there.
    pub other_repo_root: Option<PathBuf>,
    pub module_set_names: Vec<String>,
    pub all_module_sets: bool,
    pub skip_tidy: bool,
}

/// Point every local requirement on another repository's module sets at
/// their published versions, one branch per updated set.
///
/// Each new branch stays checked out and the next set builds on it, so a
/// second run over the same sets finds nothing to change.
pub fn run_sync(repo: &dyn Repository, options: &SyncOptions) -> Result<Vec<SetUpdate>> {
    verify_working_tree_clean(repo)?;

    let other = load_other_versioning_file(options)?;
    let set_names = select_module_sets(
        &other.module_sets,
        &options.module_set_names,
        options.all_module_sets,
    )?;
    let local = ModuleVersioning::load(&options.versioning_file, repo.root())?;
    let base_ref = repo.current_ref()?;
    let mut committed = false;

    let mut updates = Vec::with_capacity(set_names.len());
    for name in set_names {
        let set = other.module_set(&name)?;
        info!("===== Module set: {name} =====");

        let changed = update_module_files(local.module_files(), &set.modules, &set.version)?;
        if changed.is_empty() || verify_working_tree_clean(repo).is_ok() {
            info!("Module set {name} already up to date, skipping");
            updates.push(SetUpdate::UpToDate { module_set: name });
            continue;
        }

        if options.skip_tidy {
            info!("Skipping go mod tidy");
        } else {
            tidy_modules(&local);
        }

        let branch = release_branch_name("sync", &name, &set.version);
        switch_to_new_branch(repo, &branch, &changed)?;
        let message = format!("Sync repo to use {name} with version {}", set.version);
        let commit = repo
            .commit_all(&message)
            .map_err(|source| MultimodError::LeftOnBranch {
                branch: branch.clone(),
                source: Box::new(source),
            })?;
        info!("Committed {} on branch {branch}", commit.short());
        committed = true;

        updates.push(SetUpdate::Committed {
            module_set: name,
            branch,
            commit,
        });
    }

    if committed {
        info!("Sync finished; review the changes with `git diff {base_ref}`");
    }
    Ok(updates)
}

fn load_other_versioning_file(options: &SyncOptions) -> Result<VersioningFile> {
    let file = VersioningFile::load(&options.other_versioning_file)?;
    if let Some(root) = &options.other_repo_root {
        ModuleVersioning::load(&options.other_versioning_file, root)?;
    }
    Ok(file)
}

/// Run `go mod tidy` in every module directory. Failures are only logged.
fn tidy_modules(versioning: &ModuleVersioning) {
    for (module, file) in &versioning.module_path_map {
        let Some(dir) = file.parent() else {
            continue;
        };
        if let Err(err) = process::run_in("go", &["mod", "tidy"], dir) {
            warn!("go mod tidy failed for {module}: {err}");
        }
    }
}
