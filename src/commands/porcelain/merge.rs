use crate::areas::repository::{Repository, UNTRACKED_IN_THE_WAY_MESSAGE};
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::merge::outcome::MergeOutcome;
use crate::artifacts::merge::resolution::{Resolution, resolve};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::staged::{Staged, StagedChange};
use crate::commands::porcelain::branch::NO_SUCH_BRANCH_MESSAGE;
use crate::errors::RepositoryError;
use std::io::Write;
use std::path::PathBuf;

pub const UNCOMMITTED_CHANGES_MESSAGE: &str = "You have uncommitted changes.";
pub const MERGE_WITH_ITSELF_MESSAGE: &str = "Cannot merge a branch with itself.";
pub const ALREADY_UP_TO_DATE_MESSAGE: &str = "Given branch is an ancestor of the current branch.";
pub const FAST_FORWARD_MESSAGE: &str = "Current branch fast-forwarded.";
pub const MERGE_CONFLICT_MESSAGE: &str = "Encountered a merge conflict.";

impl Repository {
    /// Merge the branch `target` into the current branch
    ///
    /// Conflicting paths are committed with conflict markers and reported in
    /// the returned [`MergeOutcome`].
    pub fn merge(&mut self, target: &str) -> anyhow::Result<MergeOutcome> {
        self.ensure_initialized()?;

        if !self.load_staged()?.is_empty() {
            return Err(RepositoryError::invalid_state(UNCOMMITTED_CHANGES_MESSAGE).into());
        }

        let target_branch = BranchName::try_parse(target.to_string())
            .map_err(|_| RepositoryError::not_found(NO_SUCH_BRANCH_MESSAGE))?;
        let merge_oid = self
            .refs()
            .read_branch(&target_branch)?
            .ok_or_else(|| RepositoryError::not_found(NO_SUCH_BRANCH_MESSAGE))?;

        let current_branch = self.refs().current_branch()?;
        if current_branch == target_branch {
            return Err(RepositoryError::invalid_state(MERGE_WITH_ITSELF_MESSAGE).into());
        }

        let (head_oid, head_commit) = self.head_commit()?;

        eprintln!("Merging {} into {}", target_branch, current_branch);

        let base_oid = self
            .lca_finder()
            .lowest_common_ancestor(&head_oid, &merge_oid)?;

        if base_oid == merge_oid {
            writeln!(self.writer(), "{}", ALREADY_UP_TO_DATE_MESSAGE)?;
            return Ok(MergeOutcome::AlreadyUpToDate);
        }

        let merge_commit = self.database().load_commit(&merge_oid)?;

        if base_oid == head_oid {
            self.switch_tree(&merge_commit)?;
            self.refs().update_head(&merge_oid)?;

            writeln!(self.writer(), "{}", FAST_FORWARD_MESSAGE)?;
            return Ok(MergeOutcome::FastForward {
                from: head_oid,
                to: merge_oid,
            });
        }

        let base_commit = self.database().load_commit(&base_oid)?;
        let mine = Staged::delta(&base_commit, &head_commit);
        let theirs = Staged::delta(&base_commit, &merge_commit);
        let resolutions = resolve(&mine, &theirs);

        // every resolution writes or deletes a working file
        if resolutions
            .iter()
            .any(|(path, _)| !head_commit.is_tracked(path) && self.workspace().exists(path))
        {
            return Err(RepositoryError::invalid_state(UNTRACKED_IN_THE_WAY_MESSAGE).into());
        }

        let (staged, conflicts) = self.apply_resolutions(resolutions)?;
        self.save_staged(&staged)?;

        let message = format!("Merged {} into {}.", target_branch, current_branch);
        let commit = head_commit.derive_merge(
            &staged,
            &message,
            Commit::timestamp_from_env()?,
            merge_oid,
        )?;
        let commit_oid = self.database().store(&commit)?;
        self.refs().update_head(&commit_oid)?;
        self.reset_staged()?;

        if !conflicts.is_empty() {
            writeln!(self.writer(), "{}", MERGE_CONFLICT_MESSAGE)?;
        }

        Ok(MergeOutcome::Merged {
            commit: commit_oid,
            conflicts,
        })
    }

    /// Bring every resolution into the working tree and stage it
    fn apply_resolutions(
        &self,
        resolutions: Vec<(PathBuf, Resolution)>,
    ) -> anyhow::Result<(Staged, Vec<PathBuf>)> {
        let mut staged = Staged::default();
        let mut conflicts = Vec::new();

        for (path, resolution) in resolutions {
            match resolution {
                Resolution::Take(Some(blob_oid)) => {
                    let blob = self.database().load_blob(&blob_oid)?;
                    self.workspace().write_file(&path, blob.content())?;
                    staged.insert(path, Some(blob_oid));
                }
                Resolution::Take(None) => {
                    self.workspace().remove_file(&path)?;
                    staged.stage_for_removal(path);
                }
                Resolution::Conflict { current, given } => {
                    let blob = Blob::conflict(
                        self.load_side(&current)?.as_ref(),
                        self.load_side(&given)?.as_ref(),
                    );
                    let blob_oid = self.database().store(&blob)?;
                    self.workspace().write_file(&path, blob.content())?;
                    staged.insert(path.clone(), Some(blob_oid));
                    conflicts.push(path);
                }
            }
        }

        Ok((staged, conflicts))
    }

    fn load_side(&self, change: &StagedChange) -> anyhow::Result<Option<Blob>> {
        change
            .as_ref()
            .map(|blob_oid| self.database().load_blob(blob_oid))
            .transpose()
    }
}
