use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::RepositoryError;

pub const NO_SUCH_BRANCH_MESSAGE: &str = "A branch with that name does not exist.";
pub const REMOVE_CURRENT_BRANCH_MESSAGE: &str = "Cannot remove the current branch.";

impl Repository {
    /// Create a branch pointing at the HEAD commit; HEAD stays where it is
    pub fn branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(branch_name.to_string())?;
        let (head_oid, _) = self.head_commit()?;

        self.refs().create_branch(&branch_name, &head_oid)?;

        Ok(())
    }

    /// Delete a branch pointer; its commits stay in the database
    pub fn remove_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| RepositoryError::not_found(NO_SUCH_BRANCH_MESSAGE))?;

        if !self.refs().branch_exists(&branch_name) {
            return Err(RepositoryError::not_found(NO_SUCH_BRANCH_MESSAGE).into());
        }

        if self.refs().is_current_branch(&branch_name)? {
            return Err(RepositoryError::invalid_state(REMOVE_CURRENT_BRANCH_MESSAGE).into());
        }

        self.refs().delete_branch(&branch_name)?;

        Ok(())
    }
}
