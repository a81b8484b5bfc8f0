pub mod config;
pub mod discovery;
pub mod errors;
pub mod git;
pub mod gomod;
pub mod manifest;
pub mod prerelease;
pub mod process;
pub mod release;
pub mod sync;
pub mod tag;
pub mod verify;
pub mod versioning;

// Re-export commonly used items
pub use config::Config;
pub use discovery::{ModulePathMap, build_module_path_map, find_module_files};
pub use errors::{MultimodError, Result};
pub use git::{CommitHash, Repository, SystemGit, find_repo_root, verify_working_tree_clean};
pub use gomod::{parse_module_path, update_module_files, update_requirements};
pub use manifest::{ModulePath, ModuleSet, ModuleSetMap, VersioningFile, select_module_sets};
pub use prerelease::{PrereleaseOptions, run_prerelease};
pub use release::{ModuleSetRelease, ModuleTagName, SetUpdate, derive_tag_name};
pub use sync::{SyncOptions, run_sync};
pub use tag::{TagOptions, TagOutcome, run_tag};
pub use verify::run_verify;
pub use versioning::{ModuleInfo, ModuleInfoMap, ModuleVersioning};

#[cfg(test)]
mod test_repo;
