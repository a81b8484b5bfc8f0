use crate::errors::{MultimodError, Result};
use crate::git::{CommitHash, Repository};
use crate::release::ModuleSetRelease;
use std::path::PathBuf;
use tracing::{error, info};

/// Inputs of the `tag` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOptions {
    pub versioning_file: PathBuf,
    pub module_set_name: String,
    /// Commit to tag, or whose tags are deleted. Any revision git understands.
    pub commit: String,
    /// Delete the module set's tags instead of creating them.
    pub delete: bool,
}

/// What a successful `tag` run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    Created {
        commit: CommitHash,
        tags: Vec<String>,
    },
    Deleted {
        commit: CommitHash,
        tags: Vec<String>,
    },
}

/// Tag (or untag) every module of a set on one commit.
pub fn run_tag(repo: &dyn Repository, options: &TagOptions) -> Result<TagOutcome> {
    let release = ModuleSetRelease::new(
        &options.versioning_file,
        &options.module_set_name,
        repo.root(),
    )?;
    let commit = repo.resolve_revision(&options.commit)?;

    if options.delete {
        let tagger = Tagger::verified_for_deletion(repo, release, commit)?;
        tagger.delete_module_set_tags()
    } else {
        let tagger = Tagger::verified(repo, release, commit)?;
        tagger.tag_all_modules()
    }
}

/// Message attached to every tag of a module set release.
pub fn tag_message(module_set_name: &str, version: &str) -> String {
    format!("Module set {module_set_name}, Version {version}")
}

/// A module set release whose tag preconditions have been checked.
///
/// Constructed only through [`Tagger::verified`] or
/// [`Tagger::verified_for_deletion`], so holding one means the matching
/// mutation is safe to start.
pub struct Tagger<'a> {
    repo: &'a dyn Repository,
    release: ModuleSetRelease,
    commit: CommitHash,
    /// Tags that exist and will be removed; empty on the creation path.
    existing_tags: Vec<String>,
}

impl<'a> Tagger<'a> {
    /// Check that none of the set's tags exist yet.
    pub fn verified(
        repo: &'a dyn Repository,
        release: ModuleSetRelease,
        commit: CommitHash,
    ) -> Result<Self> {
        release.verify_tags_do_not_exist(repo)?;
        Ok(Self {
            repo,
            release,
            commit,
            existing_tags: Vec::new(),
        })
    }

    /// Check that every existing tag of the set points at `commit`.
    pub fn verified_for_deletion(
        repo: &'a dyn Repository,
        release: ModuleSetRelease,
        commit: CommitHash,
    ) -> Result<Self> {
        let existing_tags = verify_tags_on_commit(repo, &release.full_tag_names(), &commit)?;
        Ok(Self {
            repo,
            release,
            commit,
            existing_tags,
        })
    }

    /// Create one annotated tag per module, in declaration order.
    ///
    /// On the first failure every tag created by this call is deleted again
    /// before the error is returned.
    pub fn tag_all_modules(self) -> Result<TagOutcome> {
        let tags = self.release.full_tag_names();
        let message = tag_message(&self.release.module_set_name, self.release.version());
        let mut created: Vec<String> = Vec::with_capacity(tags.len());

        info!("Tagging commit {}:", self.commit);
        for tag in &tags {
            info!("  {tag}");
            if let Err(err) = self.repo.create_tag(tag, &self.commit, &message) {
                error!("error creating tag {tag}, removing tags created so far...");
                return Err(self.roll_back(tag, err, created));
            }
            created.push(tag.clone());
        }

        Ok(TagOutcome::Created {
            commit: self.commit,
            tags,
        })
    }

    /// Delete the set's tags that exist. The first failure aborts the run.
    pub fn delete_module_set_tags(self) -> Result<TagOutcome> {
        for tag in &self.existing_tags {
            info!("Deleting tag {tag}");
            self.repo.delete_tag(tag)?;
        }

        Ok(TagOutcome::Deleted {
            commit: self.commit,
            tags: self.existing_tags,
        })
    }

    fn roll_back(
        &self,
        failed_tag: &str,
        cause: MultimodError,
        created: Vec<String>,
    ) -> MultimodError {
        let mut leftover_tags = Vec::new();
        for tag in created.into_iter().rev() {
            if let Err(err) = self.repo.delete_tag(&tag) {
                error!("could not delete tag {tag} during rollback: {err}");
                leftover_tags.push(tag);
            }
        }

        if leftover_tags.is_empty() {
            MultimodError::TagCreation {
                tag: failed_tag.to_string(),
                source: Box::new(cause),
            }
        } else {
            MultimodError::TagRollback {
                tag: failed_tag.to_string(),
                source: Box::new(cause),
                leftover_tags,
            }
        }
    }
}

/// Return the subset of `tags` that exist, failing when any of them is not on `commit`.
pub fn verify_tags_on_commit(
    repo: &dyn Repository,
    tags: &[String],
    commit: &CommitHash,
) -> Result<Vec<String>> {
    let mut existing = Vec::new();
    let mut not_on_commit = Vec::new();

    for tag in tags {
        match repo.tag_commit(tag)? {
            Some(tagged) if tagged == *commit => existing.push(tag.clone()),
            Some(_) => not_on_commit.push(tag.clone()),
            None => continue,
        }
    }

    if not_on_commit.is_empty() {
        Ok(existing)
    } else {
        Err(MultimodError::TagsNotOnCommit {
            commit: commit.to_string(),
            tags: not_on_commit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_repo::TestRepo;
    use std::cell::RefCell;
    use std::collections::{BTreeMap, BTreeSet};
    use std::path::Path;

    const COMMIT_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const COMMIT_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    /// In-memory tag store with injectable failures
    struct FakeRepo {
        root: std::path::PathBuf,
        tags: RefCell<BTreeMap<String, CommitHash>>,
        fail_create: BTreeSet<String>,
        fail_delete: BTreeSet<String>,
    }

    impl FakeRepo {
        fn new(root: &Path) -> Self {
            Self {
                root: root.to_path_buf(),
                tags: RefCell::new(BTreeMap::new()),
                fail_create: BTreeSet::new(),
                fail_delete: BTreeSet::new(),
            }
        }

        fn with_tag(self, tag: &str, commit: &str) -> Self {
            self.tags
                .borrow_mut()
                .insert(tag.to_string(), CommitHash::new(commit));
            self
        }

        fn tag_names(&self) -> Vec<String> {
            self.tags.borrow().keys().cloned().collect()
        }
    }

    impl Repository for FakeRepo {
        fn root(&self) -> &Path {
            &self.root
        }

        fn resolve_revision(&self, revision: &str) -> Result<CommitHash> {
            [COMMIT_A, COMMIT_B]
                .into_iter()
                .find(|full| full.starts_with(revision))
                .map(CommitHash::new)
                .ok_or_else(|| MultimodError::Git(format!("unknown revision {revision}")))
        }

        fn tag_commit(&self, tag: &str) -> Result<Option<CommitHash>> {
            Ok(self.tags.borrow().get(tag).cloned())
        }

        fn create_tag(&self, tag: &str, commit: &CommitHash, _message: &str) -> Result<()> {
            if self.fail_create.contains(tag) {
                return Err(MultimodError::Git(format!("cannot create {tag}")));
            }
            self.tags
                .borrow_mut()
                .insert(tag.to_string(), commit.clone());
            Ok(())
        }

        fn delete_tag(&self, tag: &str) -> Result<()> {
            if self.fail_delete.contains(tag) {
                return Err(MultimodError::Git(format!("cannot delete {tag}")));
            }
            self.tags
                .borrow_mut()
                .remove(tag)
                .map(|_| ())
                .ok_or_else(|| MultimodError::Git(format!("no tag {tag}")))
        }

        fn status(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn current_ref(&self) -> Result<String> {
            Ok("main".to_string())
        }

        fn create_branch(&self, _branch: &str) -> Result<()> {
            Ok(())
        }

        fn commit_all(&self, _message: &str) -> Result<CommitHash> {
            Ok(CommitHash::new(COMMIT_A))
        }

        fn restore_files(&self, _paths: &[std::path::PathBuf]) -> Result<()> {
            Ok(())
        }
    }

    /// Module tree with a three-module set and a single-module set
    struct Fixture {
        _temp: tempfile::TempDir,
        root: std::path::PathBuf,
        versions: std::path::PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = tempfile::tempdir().unwrap();
            let root = temp.path().to_path_buf();
            for (dir, module) in [
                ("a", "example.com/a"),
                ("b", "example.com/b"),
                ("c", "example.com/c"),
                ("test", "example.com/test"),
            ] {
                std::fs::create_dir_all(root.join(dir)).unwrap();
                std::fs::write(root.join(dir).join("go.mod"), format!("module {module}\n"))
                    .unwrap();
            }
            let versions = root.join("versions.yaml");
            std::fs::write(
                &versions,
                "module-sets:\n  trio:\n    version: v1.0.0\n    modules:\n      - example.com/a\n      - example.com/b\n      - example.com/c\n  single:\n    version: v0.1.0\n    modules:\n      - example.com/test\n",
            )
            .unwrap();
            Self {
                _temp: temp,
                root,
                versions,
            }
        }

        fn options(&self, set: &str, commit: &str, delete: bool) -> TagOptions {
            TagOptions {
                versioning_file: self.versions.clone(),
                module_set_name: set.to_string(),
                commit: commit.to_string(),
                delete,
            }
        }
    }

    #[test]
    fn tags_every_module_in_declaration_order() {
        let fixture = Fixture::new();
        let repo = FakeRepo::new(&fixture.root);

        let outcome = run_tag(&repo, &fixture.options("trio", "aaaa", false)).unwrap();

        assert_eq!(
            outcome,
            TagOutcome::Created {
                commit: CommitHash::new(COMMIT_A),
                tags: vec!["a/v1.0.0".into(), "b/v1.0.0".into(), "c/v1.0.0".into()],
            }
        );
        assert_eq!(repo.tag_names(), vec!["a/v1.0.0", "b/v1.0.0", "c/v1.0.0"]);
    }

    #[test]
    fn existing_tag_blocks_creation_without_mutation() {
        let fixture = Fixture::new();
        let repo = FakeRepo::new(&fixture.root).with_tag("b/v1.0.0", COMMIT_B);

        match run_tag(&repo, &fixture.options("trio", COMMIT_A, false)) {
            Err(MultimodError::TagExists { tags }) => assert_eq!(tags, vec!["b/v1.0.0"]),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(repo.tag_names(), vec!["b/v1.0.0"]);
    }

    #[test]
    fn failed_creation_rolls_back_earlier_tags() {
        let fixture = Fixture::new();
        let mut repo = FakeRepo::new(&fixture.root);
        repo.fail_create.insert("c/v1.0.0".into());

        match run_tag(&repo, &fixture.options("trio", COMMIT_A, false)) {
            Err(MultimodError::TagCreation { tag, .. }) => assert_eq!(tag, "c/v1.0.0"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(repo.tag_names().is_empty());
    }

    #[test]
    fn rollback_failure_keeps_both_errors() {
        let fixture = Fixture::new();
        let mut repo = FakeRepo::new(&fixture.root);
        repo.fail_create.insert("c/v1.0.0".into());
        repo.fail_delete.insert("a/v1.0.0".into());

        match run_tag(&repo, &fixture.options("trio", COMMIT_A, false)) {
            Err(MultimodError::TagRollback {
                tag,
                source,
                leftover_tags,
            }) => {
                assert_eq!(tag, "c/v1.0.0");
                assert!(source.to_string().contains("cannot create c/v1.0.0"));
                assert_eq!(leftover_tags, vec!["a/v1.0.0"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(repo.tag_names(), vec!["a/v1.0.0"]);
    }

    #[test]
    fn deletion_refused_when_a_tag_is_on_another_commit() {
        let fixture = Fixture::new();
        let repo = FakeRepo::new(&fixture.root).with_tag("test/v0.1.0", COMMIT_A);

        match run_tag(&repo, &fixture.options("single", COMMIT_B, true)) {
            Err(MultimodError::TagsNotOnCommit { commit, tags }) => {
                assert_eq!(commit, COMMIT_B);
                assert_eq!(tags, vec!["test/v0.1.0"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(repo.tag_names(), vec!["test/v0.1.0"]);
    }

    #[test]
    fn deletion_lists_every_offending_tag_and_deletes_nothing() {
        let fixture = Fixture::new();
        let repo = FakeRepo::new(&fixture.root)
            .with_tag("a/v1.0.0", COMMIT_B)
            .with_tag("b/v1.0.0", COMMIT_A)
            .with_tag("c/v1.0.0", COMMIT_A);

        match run_tag(&repo, &fixture.options("trio", "bbb", true)) {
            Err(MultimodError::TagsNotOnCommit { tags, .. }) => {
                assert_eq!(tags, vec!["b/v1.0.0", "c/v1.0.0"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(repo.tag_names().len(), 3);
    }

    #[test]
    fn deletes_existing_tags_and_skips_missing_ones() {
        let fixture = Fixture::new();
        let repo = FakeRepo::new(&fixture.root)
            .with_tag("a/v1.0.0", COMMIT_A)
            .with_tag("c/v1.0.0", COMMIT_A)
            .with_tag("unrelated", COMMIT_B);

        let outcome = run_tag(&repo, &fixture.options("trio", COMMIT_A, true)).unwrap();

        assert_eq!(
            outcome,
            TagOutcome::Deleted {
                commit: CommitHash::new(COMMIT_A),
                tags: vec!["a/v1.0.0".into(), "c/v1.0.0".into()],
            }
        );
        assert_eq!(repo.tag_names(), vec!["unrelated"]);
    }

    #[test]
    fn deletion_failure_aborts_immediately() {
        let fixture = Fixture::new();
        let mut repo = FakeRepo::new(&fixture.root)
            .with_tag("a/v1.0.0", COMMIT_A)
            .with_tag("b/v1.0.0", COMMIT_A)
            .with_tag("c/v1.0.0", COMMIT_A);
        repo.fail_delete.insert("b/v1.0.0".into());

        assert!(run_tag(&repo, &fixture.options("trio", COMMIT_A, true)).is_err());
        assert_eq!(repo.tag_names(), vec!["b/v1.0.0", "c/v1.0.0"]);
    }

    #[test]
    fn unknown_commit_is_rejected_before_tagging() {
        let fixture = Fixture::new();
        let repo = FakeRepo::new(&fixture.root);

        assert!(matches!(
            run_tag(&repo, &fixture.options("trio", "ffff", false)),
            Err(MultimodError::Git(_))
        ));
        assert!(repo.tag_names().is_empty());
    }

    #[test]
    fn tags_and_untags_a_real_repository() {
        let repo = TestRepo::new();
        repo.write("go.mod", "module example.com/root\n");
        repo.write("lib/go.mod", "module example.com/lib\n");
        let versions = repo.write(
            "versions.yaml",
            "module-sets:\n  stable:\n    version: v1.4.0\n    modules:\n      - example.com/root\n      - example.com/lib\n",
        );
        repo.commit("add modules");
        let head = repo.head();
        let git = repo.git();

        let options = TagOptions {
            versioning_file: versions,
            module_set_name: "stable".into(),
            commit: head[..10].to_string(),
            delete: false,
        };
        run_tag(&git, &options).unwrap();

        assert_eq!(repo.tags(), vec!["lib/v1.4.0", "v1.4.0"]);
        assert_eq!(
            repo.git_cmd(&["tag", "-l", "--format=%(contents:subject)", "v1.4.0"]),
            "Module set stable, Version v1.4.0"
        );
        assert!(matches!(
            run_tag(&git, &options),
            Err(MultimodError::TagExists { .. })
        ));

        let delete = TagOptions {
            delete: true,
            ..options
        };
        run_tag(&git, &delete).unwrap();
        assert!(repo.tags().is_empty());
    }
}
