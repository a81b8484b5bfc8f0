use std::io;
use std::path::{Path, PathBuf};

/// Canonical result type for multimod code
pub type Result<T> = std::result::Result<T, MultimodError>;

/// Common error type for multimod operations
#[derive(Debug, thiserror::Error)]
pub enum MultimodError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Could not parse versioning file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid version '{version}' for module set '{module_set}': {message}")]
    InvalidVersion {
        module_set: String,
        version: String,
        message: String,
    },

    #[error("Module set '{0}' not found in versioning file")]
    ModuleSetNotFound(String),

    #[error("Module '{module}' is listed in the versioning file but no go.mod declares it under {}", root.display())]
    ModuleNotFound { module: String, root: PathBuf },

    #[error("Invalid module file {}: {message}", path.display())]
    InvalidModuleFile { path: PathBuf, message: String },

    #[error("Module '{module}' is declared by both {} and {}", first.display(), second.display())]
    DuplicateModuleFile {
        module: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Module '{module}' is listed in both module set '{first_set}' and '{second_set}'")]
    DuplicateModule {
        module: String,
        first_set: String,
        second_set: String,
    },

    #[error("Module '{module}' is excluded but listed in module set '{module_set}'")]
    ExcludedModuleInSet { module: String, module_set: String },

    #[error("Git tags already exist: {}", tags.join(", "))]
    TagExists { tags: Vec<String> },

    #[error("Tags are not on commit {commit}: {}", tags.join(", "))]
    TagsNotOnCommit { commit: String, tags: Vec<String> },

    #[error("Failed to create tag {tag}: {source}")]
    TagCreation {
        tag: String,
        #[source]
        source: Box<MultimodError>,
    },

    #[error(
        "Failed to create tag {tag}: {source}; rollback could not delete: {}",
        leftover_tags.join(", ")
    )]
    TagRollback {
        tag: String,
        #[source]
        source: Box<MultimodError>,
        leftover_tags: Vec<String>,
    },

    #[error("{source}; uncommitted changes were left on branch {branch}")]
    LeftOnBranch {
        branch: String,
        #[source]
        source: Box<MultimodError>,
    },

    #[error("Working tree is not clean, commit or stash these changes first:\n{}", entries.join("\n"))]
    DirtyWorkingTree { entries: Vec<String> },

    #[error("No git repository found at or above {}", .0.display())]
    RepoNotFound(PathBuf),

    #[error("Git error: {0}")]
    Git(String),

    #[error("Command `{command}` failed: {message}")]
    Command { command: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Versioning file does not match the repository:\n  {}", problems.join("\n  "))]
    Verification { problems: Vec<String> },
}

impl MultimodError {
    pub(crate) fn parse<P: AsRef<Path>>(path: P, message: impl ToString) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// Helper to create an IO error with file path context
pub fn io_error_with_path<P: AsRef<Path>>(error: io::Error, path: P) -> io::Error {
    io::Error::new(
        error.kind(),
        format!("{}: {}", path.as_ref().display(), error),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_not_on_commit_lists_every_tag() {
        let err = MultimodError::TagsNotOnCommit {
            commit: "abc123".into(),
            tags: vec!["test/v0.1.0".into(), "v0.1.0".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("abc123"));
        assert!(msg.contains("test/v0.1.0, v0.1.0"));
    }

    #[test]
    fn rollback_error_keeps_original_cause() {
        let err = MultimodError::TagRollback {
            tag: "c/v1.0.0".into(),
            source: Box::new(MultimodError::Git("boom".into())),
            leftover_tags: vec!["a/v1.0.0".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("c/v1.0.0"));
        assert!(msg.contains("boom"));
        assert!(msg.contains("a/v1.0.0"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn left_on_branch_names_the_branch() {
        let err = MultimodError::LeftOnBranch {
            branch: "pre_release_stable_v1.5.0".into(),
            source: Box::new(MultimodError::Command {
                command: "make lint".into(),
                message: "exited with 2".into(),
            }),
        };
        let msg = err.to_string();
        assert!(msg.contains("make lint"));
        assert!(msg.contains("pre_release_stable_v1.5.0"));
    }

    #[test]
    fn io_error_with_path_prefixes_path() {
        let err = io_error_with_path(
            io::Error::new(io::ErrorKind::NotFound, "missing"),
            "/tmp/go.mod",
        );
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(err.to_string(), "/tmp/go.mod: missing");
    }
}
