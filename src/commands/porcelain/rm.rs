use crate::areas::repository::Repository;
use crate::errors::RepositoryError;
use std::path::Path;

pub const NOTHING_TO_REMOVE_MESSAGE: &str = "No reason to remove the file.";

impl Repository {
    /// Unstage `path`, or stage its removal if HEAD tracks it
    ///
    /// A tracked file still present in the working tree is deleted.
    pub fn rm(&mut self, path: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let path = self.workspace().relative_path(Path::new(path))?;
        let (_, head_commit) = self.head_commit()?;
        let mut staged = self.load_staged()?;

        // unstaging leaves the working file alone
        if !staged.remove_staged(&path) {
            if !head_commit.is_tracked(&path) {
                return Err(RepositoryError::invalid_state(NOTHING_TO_REMOVE_MESSAGE).into());
            }

            staged.stage_for_removal(path.clone());
            self.workspace().remove_file(&path)?;
        }

        self.save_staged(&staged)?;

        Ok(())
    }
}
