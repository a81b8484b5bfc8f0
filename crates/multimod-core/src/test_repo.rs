//! Throwaway git repositories for tests.

use crate::git::SystemGit;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git repository in a temp dir, on branch `main` with one initial commit.
pub struct TestRepo {
    root: PathBuf,
    _temp_dir: tempfile::TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().to_path_buf();
        let repo = Self {
            root,
            _temp_dir: temp_dir,
        };

        repo.git_cmd(&["init", "--quiet"]);
        repo.git_cmd(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo.git_cmd(&["config", "user.name", "Test User"]);
        repo.git_cmd(&["config", "user.email", "test@example.com"]);
        repo.git_cmd(&["config", "commit.gpgsign", "false"]);
        repo.git_cmd(&["config", "tag.gpgsign", "false"]);
        repo.write("README.md", "test repository\n");
        repo.commit("initial commit");
        repo
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn git(&self) -> SystemGit {
        SystemGit::open(&self.root).unwrap()
    }

    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.root.join(rel)).unwrap()
    }

    pub fn commit(&self, message: &str) {
        self.git_cmd(&["add", "--all"]);
        self.git_cmd(&["commit", "--quiet", "-m", message]);
    }

    pub fn branches(&self) -> Vec<String> {
        self.git_cmd(&["branch", "--format=%(refname:short)"])
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn tags(&self) -> Vec<String> {
        self.git_cmd(&["tag", "--list"])
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn head(&self) -> String {
        self.git_cmd(&["rev-parse", "HEAD"])
    }

    /// Run git in the repository and return trimmed stdout, panicking on failure.
    pub fn git_cmd(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}
