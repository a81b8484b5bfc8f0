use multimod_core::{Config, Repository, SystemGit, errors::Result};
use std::path::{Path, PathBuf};

/// Repository and settings every command starts from.
pub struct CommandContext {
    pub repo: SystemGit,
    pub config: Config,
    pub cwd: PathBuf,
}

impl CommandContext {
    /// Open the repository enclosing the current directory and load its configuration.
    pub fn from_cwd() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::from_dir(&cwd)
    }

    pub fn from_dir(cwd: &Path) -> Result<Self> {
        let repo = SystemGit::discover(cwd)?;
        let config = Config::load(repo.root())?;
        tracing::debug!("using repository at {}", repo.root().display());
        Ok(Self {
            repo,
            config,
            cwd: cwd.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        self.repo.root()
    }

    /// Versioning file named on the command line (relative to the current
    /// directory), or the configured one.
    pub fn versioning_file(&self, arg: Option<&Path>) -> PathBuf {
        match arg {
            Some(path) => self.resolve(path),
            None => self.config.versioning_file_in(self.root()),
        }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}
