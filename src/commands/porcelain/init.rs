use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::staged::Staged;
use crate::errors::RepositoryError;
use anyhow::Context;
use std::fs;
use std::io::Write;

pub const ALREADY_INITIALIZED_MESSAGE: &str =
    "A twig version-control system already exists in the current directory.";

impl Repository {
    pub fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(RepositoryError::invalid_state(ALREADY_INITIALIZED_MESSAGE).into());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .twig/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .twig/refs/heads directory")?;

        let initial_commit_oid = self
            .database()
            .store(&Commit::initial())
            .context("Failed to store the initial commit")?;

        let default_branch = BranchName::default_branch();
        self.refs()
            .create_branch(&default_branch, &initial_commit_oid)
            .context("Failed to create the default branch")?;
        self.refs()
            .set_head(&default_branch)
            .context("Failed to create initial HEAD reference")?;

        self.save_staged(&Staged::default())
            .context("Failed to create the staging index")?;

        writeln!(
            self.writer(),
            "Initialized empty twig repository in {}",
            self.repository_path().display()
        )?;

        Ok(())
    }
}
