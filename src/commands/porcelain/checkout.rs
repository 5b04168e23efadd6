use crate::areas::repository::{Repository, UNTRACKED_IN_THE_WAY_MESSAGE};
use crate::areas::refs::HEAD_REF_NAME;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::objects::commit::Commit;
use crate::errors::RepositoryError;
use std::path::Path;

pub const NO_SUCH_CHECKOUT_BRANCH_MESSAGE: &str = "No such branch exists.";
pub const CHECKOUT_CURRENT_BRANCH_MESSAGE: &str = "No need to checkout the current branch.";
pub const FILE_NOT_IN_COMMIT_MESSAGE: &str = "File does not exist in that commit.";

impl Repository {
    /// Switch to `branch_name`, replacing the working tree with its HEAD commit
    pub fn checkout_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| RepositoryError::not_found(NO_SUCH_CHECKOUT_BRANCH_MESSAGE))?;
        let target_oid = self
            .refs()
            .read_branch(&branch_name)?
            .ok_or_else(|| RepositoryError::not_found(NO_SUCH_CHECKOUT_BRANCH_MESSAGE))?;

        if self.refs().is_current_branch(&branch_name)? {
            return Err(RepositoryError::invalid_state(CHECKOUT_CURRENT_BRANCH_MESSAGE).into());
        }

        let target_commit = self.database().load_commit(&target_oid)?;
        self.switch_tree(&target_commit)?;
        self.refs().set_head(&branch_name)?;

        Ok(())
    }

    /// Restore `path` as recorded by `revision` (HEAD when absent), without staging it
    pub fn checkout_file(&mut self, revision: Option<&str>, path: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let revision = Revision::try_parse(revision.unwrap_or(HEAD_REF_NAME))?;
        let commit_oid = revision.resolve(self)?;
        let commit = self.database().load_commit(&commit_oid)?;

        let path = self.workspace().relative_path(Path::new(path))?;
        let blob_oid = commit
            .tracked_blob(&path)
            .ok_or_else(|| RepositoryError::not_found(FILE_NOT_IN_COMMIT_MESSAGE))?;
        let blob = self.database().load_blob(blob_oid)?;

        self.workspace().write_file(&path, blob.content())?;

        Ok(())
    }

    /// Replace the working tree of HEAD with `target` and clear the staging index
    ///
    /// Fails without touching anything when an untracked file would be overwritten.
    pub(crate) fn switch_tree(&self, target: &Commit) -> anyhow::Result<()> {
        let (_, head_commit) = self.head_commit()?;

        if !self.untracked_in_the_way(&head_commit, target)?.is_empty() {
            return Err(RepositoryError::invalid_state(UNTRACKED_IN_THE_WAY_MESSAGE).into());
        }

        self.check_out_tree(&head_commit, target)?;
        self.reset_staged()?;

        Ok(())
    }
}
