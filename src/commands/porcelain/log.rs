use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use colored::Colorize;
use std::io::Write;

pub const NO_COMMIT_WITH_MESSAGE: &str = "Found no commit with that message.";

impl Repository {
    /// Show the first-parent history from HEAD down to the initial commit
    pub fn log(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let mut curr_commit_oid = self.refs().read_head()?;

        while let Some(commit_oid) = curr_commit_oid {
            let commit = self.database().load_commit(&commit_oid)?;
            self.display_commit(&commit_oid, &commit)?;

            // Move to the parent commit for the next iteration
            curr_commit_oid = commit.parent().cloned();
        }

        Ok(())
    }

    /// Show every commit ever made, in digest order
    pub fn global_log(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        for (commit_oid, commit) in self.all_commits()? {
            self.display_commit(&commit_oid, &commit)?;
        }

        Ok(())
    }

    /// Print the digest of every commit whose message is exactly `message`
    pub fn find(&self, message: &str) -> anyhow::Result<Vec<ObjectId>> {
        self.ensure_initialized()?;

        let matches = self
            .all_commits()?
            .into_iter()
            .filter(|(_, commit)| commit.message() == message)
            .map(|(commit_oid, _)| commit_oid)
            .collect::<Vec<_>>();

        if matches.is_empty() {
            return Err(RepositoryError::not_found(NO_COMMIT_WITH_MESSAGE).into());
        }

        for commit_oid in &matches {
            writeln!(self.writer(), "{}", commit_oid)?;
        }

        Ok(matches)
    }

    fn all_commits(&self) -> anyhow::Result<Vec<(ObjectId, Commit)>> {
        let mut commits = Vec::new();

        for oid in self.database().list()? {
            if let Some(commit) = self.database().parse_object_as_commit(&oid)? {
                commits.push((oid, commit));
            }
        }

        Ok(commits)
    }

    pub fn display_commit(&self, commit_oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(self.writer(), "===")?;
        writeln!(self.writer(), "{}", format!("commit {}", commit_oid).yellow())?;
        if let (Some(first), Some(second)) = (commit.parent(), commit.second_parent()) {
            writeln!(
                self.writer(),
                "Merge: {} {}",
                first.to_short_oid(),
                second.to_short_oid()
            )?;
        }
        writeln!(self.writer(), "Date: {}", commit.readable_timestamp())?;
        writeln!(self.writer(), "{}", commit.message())?;
        writeln!(self.writer())?;

        Ok(())
    }
}
