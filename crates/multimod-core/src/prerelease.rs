use crate::errors::{MultimodError, Result};
use crate::git::{Repository, switch_to_new_branch, verify_working_tree_clean};
use crate::gomod::update_module_files;
use crate::manifest::select_module_sets;
use crate::process;
use crate::release::{ModuleSetRelease, SetUpdate, release_branch_name};
use crate::versioning::ModuleVersioning;
use std::path::PathBuf;
use tracing::info;

/// Inputs of the `prerelease` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrereleaseOptions {
    pub versioning_file: PathBuf,
    pub module_set_names: Vec<String>,
    pub all_module_sets: bool,
    /// Leave the changes uncommitted on the prerelease branch.
    pub no_commit: bool,
    pub skip_make: bool,
    /// `make` targets run before committing.
    pub make_targets: Vec<String>,
}

/// Prepare each selected module set for release on its own branch.
///
/// Every set is checked (clean tree, no tag of the new version yet) before
/// anything is written.
pub fn run_prerelease(
    repo: &dyn Repository,
    options: &PrereleaseOptions,
) -> Result<Vec<SetUpdate>> {
    let versioning = ModuleVersioning::load(&options.versioning_file, repo.root())?;
    let set_names = select_module_sets(
        &versioning.module_set_map,
        &options.module_set_names,
        options.all_module_sets,
    )?;
    if options.no_commit && set_names.len() > 1 {
        return Err(MultimodError::Config(
            "changes can only be left uncommitted for a single module set".to_string(),
        ));
    }

    verify_working_tree_clean(repo)?;
    let releases = set_names
        .iter()
        .map(|name| {
            let release = ModuleSetRelease::from_versioning(versioning.clone(), name)?;
            release.verify_tags_do_not_exist(repo)?;
            Ok(release)
        })
        .collect::<Result<Vec<_>>>()?;

    let base_ref = repo.current_ref()?;
    let mut updates = Vec::with_capacity(releases.len());
    for release in &releases {
        updates.push(prepare_module_set(repo, release, options)?);
    }
    if updates
        .iter()
        .any(|update| !matches!(update, SetUpdate::UpToDate { .. }))
    {
        info!("Prerelease finished; review the changes with `git diff {base_ref}`");
    }
    Ok(updates)
}

fn prepare_module_set(
    repo: &dyn Repository,
    release: &ModuleSetRelease,
    options: &PrereleaseOptions,
) -> Result<SetUpdate> {
    let name = release.module_set_name.clone();
    let version = release.version();
    info!("===== Module set: {name} ({version}) =====");

    let changed = update_module_files(
        release.versioning.module_files(),
        release.module_paths(),
        version,
    )?;
    if changed.is_empty() || verify_working_tree_clean(repo).is_ok() {
        info!("Module set {name} already at {version}, skipping");
        return Ok(SetUpdate::UpToDate { module_set: name });
    }

    let branch = release_branch_name("pre_release", &name, version);
    switch_to_new_branch(repo, &branch, &changed)?;
    let left_on_branch = |source: MultimodError| MultimodError::LeftOnBranch {
        branch: branch.clone(),
        source: Box::new(source),
    };

    if options.skip_make {
        info!("Skipping make targets");
    } else {
        for target in &options.make_targets {
            process::run_in("make", &[target.as_str()], repo.root()).map_err(left_on_branch)?;
        }
    }

    if options.no_commit {
        info!("Changes for {name} left uncommitted on branch {branch}");
        return Ok(SetUpdate::Uncommitted {
            module_set: name,
            branch,
        });
    }

    let commit = repo
        .commit_all(&format!("Prepare {name} for version {version}"))
        .map_err(left_on_branch)?;
    info!("Committed {} on branch {branch}", commit.short());

    Ok(SetUpdate::Committed {
        module_set: name,
        branch,
        commit,
    })
}
