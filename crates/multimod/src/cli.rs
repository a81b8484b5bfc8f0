use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// multimod – version, tag, and sync sets of Go modules in one repository
#[derive(Debug, Parser)]
#[command(name = "multimod", version, about, long_about = None)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Tag every module of a module set on a commit, or delete those tags
    Tag(TagArgs),

    /// Update requirements on another repository's module sets
    Sync(SyncArgs),

    /// Prepare module sets for release on dedicated branches
    Prerelease(PrereleaseArgs),

    /// Check the versioning file against the modules in the repository
    Verify(VerifyArgs),
}

#[derive(Debug, Args)]
pub struct TagArgs {
    /// Versioning file (defaults to the configured one, usually versions.yaml)
    #[arg(short, long, value_name = "FILE")]
    pub versioning_file: Option<PathBuf>,

    /// Module set whose modules are tagged
    #[arg(short = 'm', long, value_name = "SET")]
    pub module_set_name: String,

    /// Commit to tag; full or abbreviated hashes, branches and tags are accepted
    #[arg(short, long)]
    pub commit: String,

    /// Delete the module set's tags from the commit instead of creating them
    #[arg(short, long)]
    pub delete_module_set_tags: bool,
}

#[derive(Debug, Args)]
#[command(after_long_help = "\
Examples:\n  multimod sync -o ../otel-go/versions.yaml -m stable-v1\n  multimod sync -o ../otel-go/versions.yaml -r ../otel-go -a\n\nOne branch named sync_<set>_<version> is committed per module set that needed changes.")]
pub struct SyncArgs {
    /// Versioning file of this repository
    #[arg(short, long, value_name = "FILE")]
    pub versioning_file: Option<PathBuf>,

    /// Versioning file of the repository being synced to
    #[arg(short, long, value_name = "FILE")]
    pub other_versioning_file: PathBuf,

    /// Checkout of the other repository, used to validate its versioning file
    #[arg(short = 'r', long, value_name = "DIR")]
    pub other_repo_root: Option<PathBuf>,

    /// Module sets of the other repository to sync (prompted interactively if omitted)
    #[arg(short = 'm', long, num_args = 1.., value_name = "SET")]
    pub module_set_names: Vec<String>,

    /// Sync every module set of the other repository
    #[arg(short, long, conflicts_with = "module_set_names")]
    pub all_module_sets: bool,

    /// Do not run `go mod tidy` after updating requirements
    #[arg(short, long)]
    pub skip_go_mod_tidy: bool,
}

#[derive(Debug, Args)]
pub struct PrereleaseArgs {
    /// Versioning file of this repository
    #[arg(short, long, value_name = "FILE")]
    pub versioning_file: Option<PathBuf>,

    /// Module sets to prepare (prompted interactively if omitted)
    #[arg(short = 'm', long, num_args = 1.., value_name = "SET")]
    pub module_set_names: Vec<String>,

    /// Prepare every module set
    #[arg(short, long, conflicts_with = "module_set_names")]
    pub all_module_sets: bool,

    /// Leave the changes uncommitted (single module set only)
    #[arg(short, long)]
    pub no_commit: bool,

    /// Do not run the configured make targets
    #[arg(short, long)]
    pub skip_make: bool,
}

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Versioning file of this repository
    #[arg(short, long, value_name = "FILE")]
    pub versioning_file: Option<PathBuf>,
}
