use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::areas::staging::{STAGED_REF_NAME, StagingArea};
use crate::areas::workspace::{REPOSITORY_DIR, Workspace};
use crate::artifacts::merge::lca_finder::{LcaFinder, SlimCommit};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::staged::Staged;
use crate::artifacts::status::status_info::Status;
use crate::errors::RepositoryError;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Message reported by every command run outside a repository
pub const NOT_INITIALIZED_MESSAGE: &str = "Not in an initialized twig directory.";

/// Message reported when a checkout, reset or merge would clobber an untracked file
pub const UNTRACKED_IN_THE_WAY_MESSAGE: &str =
    "There is an untracked file in the way; delete it, or add and commit it first.";

/// A working tree and the `.twig` directory inside it
///
/// Commands are implemented as `impl Repository` blocks under
/// `commands::porcelain`; everything they print goes through `writer`.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    staging: StagingArea,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path);

        if !path.exists() {
            std::fs::create_dir_all(path).map_err(RepositoryError::file_system(path))?;
        }
        let path = path
            .canonicalize()
            .map_err(RepositoryError::file_system(path))?;
        let repository_path = path.join(REPOSITORY_DIR);

        let database = Database::new(repository_path.join("objects").into_boxed_path());
        let staging = StagingArea::new(repository_path.join(STAGED_REF_NAME).into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(repository_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            database,
            staging,
            workspace,
            refs,
        })
    }

    /// Path to the `.twig` directory
    pub fn repository_path(&self) -> PathBuf {
        self.path.join(REPOSITORY_DIR)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn inspect_status(&'_ self) -> Status<'_> {
        Status::new(self)
    }

    pub fn is_initialized(&self) -> bool {
        self.repository_path().is_dir()
    }

    pub fn ensure_initialized(&self) -> anyhow::Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(RepositoryError::invalid_state(NOT_INITIALIZED_MESSAGE).into())
        }
    }

    /// Digest and contents of the commit HEAD resolves to
    pub fn head_commit(&self) -> anyhow::Result<(ObjectId, Commit)> {
        let head_oid = self
            .refs
            .read_head()?
            .ok_or_else(|| RepositoryError::not_found("HEAD does not point to a commit"))?;
        let head_commit = self.database.load_commit(&head_oid)?;

        Ok((head_oid, head_commit))
    }

    pub fn load_staged(&self) -> anyhow::Result<Staged> {
        self.staging.load(&self.database)
    }

    pub fn save_staged(&self, staged: &Staged) -> anyhow::Result<ObjectId> {
        self.staging.save(&self.database, staged)
    }

    /// Start over with an empty staging index and drop the superseded ones
    pub fn reset_staged(&self) -> anyhow::Result<()> {
        self.staging.reset(&self.database)?;
        self.staging.compact(&self.database)?;

        Ok(())
    }

    /// Ancestry queries over the commits of this repository
    pub fn lca_finder(&self) -> LcaFinder<impl Fn(&ObjectId) -> anyhow::Result<SlimCommit> + '_> {
        LcaFinder::new(|oid: &ObjectId| {
            let commit = self.database.load_commit(oid)?;
            Ok(SlimCommit::from_commit(oid.clone(), &commit))
        })
    }

    /// Working tree files that `target` would overwrite but `current` does not track
    pub fn untracked_in_the_way(
        &self,
        current: &Commit,
        target: &Commit,
    ) -> anyhow::Result<Vec<PathBuf>> {
        let in_the_way = target
            .tracked()
            .keys()
            .filter(|path| !current.is_tracked(path) && self.workspace.exists(path))
            .cloned()
            .collect();

        Ok(in_the_way)
    }

    /// Replace the working tree files of `current` with those of `target`
    ///
    /// Files tracked by `target` are written, files only `current` tracks
    /// are deleted. Untracked files must have been checked beforehand.
    pub fn check_out_tree(&self, current: &Commit, target: &Commit) -> anyhow::Result<()> {
        for (path, blob_oid) in target.tracked() {
            let blob = self.database.load_blob(blob_oid)?;
            self.workspace.write_file(path, blob.content())?;
        }

        for path in current.tracked().keys() {
            if !target.is_tracked(path) {
                self.workspace.remove_file(path)?;
            }
        }

        Ok(())
    }
}
