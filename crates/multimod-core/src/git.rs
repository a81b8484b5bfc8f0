use crate::errors::{MultimodError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Full object id of a commit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommitHash(String);

impl CommitHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form used in log lines.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(8)]
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Version-control operations needed by the release commands.
pub trait Repository {
    /// Root of the working tree.
    fn root(&self) -> &Path;

    /// Resolve any revision (branch, tag, full or abbreviated hash) to a commit.
    fn resolve_revision(&self, revision: &str) -> Result<CommitHash>;

    /// Commit that `tag` points at, or `None` when the tag does not exist.
    fn tag_commit(&self, tag: &str) -> Result<Option<CommitHash>>;

    /// Create an annotated tag on `commit`.
    fn create_tag(&self, tag: &str, commit: &CommitHash, message: &str) -> Result<()>;

    fn delete_tag(&self, tag: &str) -> Result<()>;

    /// Porcelain status entries; empty means the working tree is clean.
    fn status(&self) -> Result<Vec<String>>;

    /// Current branch name, or the commit hash when HEAD is detached.
    fn current_ref(&self) -> Result<String>;

    /// Create `branch` at HEAD and switch to it, keeping working-tree changes.
    fn create_branch(&self, branch: &str) -> Result<()>;

    /// Stage every change and commit it.
    fn commit_all(&self, message: &str) -> Result<CommitHash>;

    /// Discard uncommitted edits to tracked `paths`.
    fn restore_files(&self, paths: &[PathBuf]) -> Result<()>;
}

/// Fail with [`MultimodError::DirtyWorkingTree`] unless the working tree is clean.
pub fn verify_working_tree_clean(repo: &dyn Repository) -> Result<()> {
    let entries = repo.status()?;
    if entries.is_empty() {
        Ok(())
    } else {
        Err(MultimodError::DirtyWorkingTree { entries })
    }
}

/// Create `branch` and switch to it, carrying the uncommitted `changed` files along.
///
/// If the branch cannot be created the edits to `changed` are discarded, so
/// the current branch is left clean.
pub fn switch_to_new_branch(
    repo: &dyn Repository,
    branch: &str,
    changed: &[PathBuf],
) -> Result<()> {
    let Err(err) = repo.create_branch(branch) else {
        return Ok(());
    };
    if let Err(restore_err) = repo.restore_files(changed) {
        tracing::error!("could not restore modified files: {restore_err}");
    }
    Err(err)
}

/// Walk upward from `start_dir` until a directory containing `.git` is found.
pub fn find_repo_root(start_dir: &Path) -> Result<PathBuf> {
    let mut current = start_dir;
    loop {
        if current.join(".git").exists() {
            return Ok(current.to_path_buf());
        }
        current = current
            .parent()
            .ok_or_else(|| MultimodError::RepoNotFound(start_dir.to_path_buf()))?;
    }
}

/// [`Repository`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct SystemGit {
    root: PathBuf,
}

impl SystemGit {
    pub fn open(root: &Path) -> Result<Self> {
        if !root.join(".git").exists() {
            return Err(MultimodError::RepoNotFound(root.to_path_buf()));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Open the repository enclosing `start_dir`.
    pub fn discover(start_dir: &Path) -> Result<Self> {
        let root = find_repo_root(start_dir)?;
        Ok(Self { root })
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()
            .map_err(MultimodError::Io)
    }

    /// Run git, returning stdout without trailing whitespace. Non-zero exits are errors.
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(MultimodError::Git(format!(
                "git {} failed ({}): {}",
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}

impl Repository for SystemGit {
    fn root(&self) -> &Path {
        &self.root
    }

    fn resolve_revision(&self, revision: &str) -> Result<CommitHash> {
        let revspec = format!("{revision}^{{commit}}");
        let hash = self
            .run(&["rev-parse", "--verify", "--quiet", &revspec])
            .map_err(|_| {
                MultimodError::Git(format!("could not resolve revision '{revision}'"))
            })?;
        Ok(CommitHash::new(hash))
    }

    fn tag_commit(&self, tag: &str) -> Result<Option<CommitHash>> {
        let reference = format!("refs/tags/{tag}");
        let exists = self
            .output(&["show-ref", "--verify", "--quiet", &reference])?
            .status
            .success();
        if !exists {
            return Ok(None);
        }

        let revspec = format!("{reference}^{{commit}}");
        let hash = self.run(&["rev-parse", "--verify", &revspec])?;
        Ok(Some(CommitHash::new(hash)))
    }

    fn create_tag(&self, tag: &str, commit: &CommitHash, message: &str) -> Result<()> {
        self.run(&["tag", "-a", tag, "-m", message, commit.as_str()])
            .map(|_| ())
    }

    fn delete_tag(&self, tag: &str) -> Result<()> {
        self.run(&["tag", "-d", tag]).map(|_| ())
    }

    fn status(&self) -> Result<Vec<String>> {
        let output = self.run(&["status", "--porcelain"])?;
        Ok(output
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect())
    }

    fn current_ref(&self) -> Result<String> {
        let branch = self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        if branch.is_empty() || branch == "HEAD" {
            return self.run(&["rev-parse", "HEAD"]);
        }
        Ok(branch)
    }

    fn create_branch(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", "-b", branch]).map(|_| ())
    }

    fn commit_all(&self, message: &str) -> Result<CommitHash> {
        self.run(&["add", "--all"])?;
        self.run(&["commit", "-m", message])?;
        self.resolve_revision("HEAD")
    }

    fn restore_files(&self, paths: &[PathBuf]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let relative: Vec<String> = paths
            .iter()
            .map(|path| {
                path.strip_prefix(&self.root)
                    .unwrap_or(path)
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        let mut args = vec!["checkout", "--"];
        args.extend(relative.iter().map(String::as_str));
        self.run(&args).map(|_| ())
    }
}
