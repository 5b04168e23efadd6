use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use std::io::Write;

pub const NOTHING_STAGED_MESSAGE: &str = "No changes added to the commit.";
pub const EMPTY_MESSAGE_MESSAGE: &str = "Please enter a commit message.";

impl Repository {
    pub fn commit(&mut self, message: &str) -> anyhow::Result<ObjectId> {
        self.ensure_initialized()?;

        let staged = self.load_staged()?;
        if staged.is_empty() {
            return Err(RepositoryError::invalid_state(NOTHING_STAGED_MESSAGE).into());
        }

        if message.trim().is_empty() {
            return Err(RepositoryError::invalid_state(EMPTY_MESSAGE_MESSAGE).into());
        }

        let (_, head_commit) = self.head_commit()?;
        let timestamp = Commit::timestamp_from_env()?;

        let commit = head_commit.derive(&staged, message, timestamp)?;
        let commit_id = self.database().store(&commit)?;
        self.refs().update_head(&commit_id)?;
        self.reset_staged()?;

        writeln!(
            self.writer(),
            "[{} {}] {}",
            self.refs().current_branch()?,
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(commit_id)
    }
}
