use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use crate::artifacts::status::inspector::Inspector;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub type ChangeSet = BTreeMap<PathBuf, WorkspaceChangeType>;
pub type FileSet = BTreeSet<PathBuf>;

/// Snapshot of a repository's state, every section sorted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub branches: Vec<BranchName>,
    pub current_branch: BranchName,
    /// Staged for addition
    pub staged_files: FileSet,
    /// Staged for removal
    pub removed_files: FileSet,
    /// Changed in the working tree relative to what the next commit records
    pub workspace_changeset: ChangeSet,
    /// Present in the working tree, neither tracked nor staged for addition
    pub untracked_files: FileSet,
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    pub fn initialize(&self) -> anyhow::Result<StatusInfo> {
        let refs = self.repository.refs();
        let (_, head_commit) = self.repository.head_commit()?;
        let staged = self.repository.load_staged()?;
        let inspector = Inspector::new(self.repository);

        let staged_files = staged
            .additions()
            .map(|(path, _)| path.clone())
            .collect::<FileSet>();
        let removed_files = staged.removals().cloned().collect::<FileSet>();

        let mut workspace_changeset = ChangeSet::new();

        // staged additions are compared with the staged content
        for (path, staged_oid) in staged.additions() {
            if let Some(change) = inspector.check_workspace_against(path, staged_oid)? {
                workspace_changeset.insert(path.clone(), change);
            }
        }

        // the rest of the head tree is compared with the committed content
        for (path, committed_oid) in head_commit.tracked() {
            if staged.get(path).is_some() {
                continue;
            }

            if let Some(change) = inspector.check_workspace_against(path, committed_oid)? {
                workspace_changeset.insert(path.clone(), change);
            }
        }

        let untracked_files = self
            .repository
            .workspace()
            .list_files()?
            .into_iter()
            .filter(|path| {
                staged.is_staged_for_removal(path)
                    || (!head_commit.is_tracked(path) && !staged.is_staged_for_addition(path))
            })
            .collect::<FileSet>();

        Ok(StatusInfo {
            branches: refs.list_branches()?,
            current_branch: refs.current_branch()?,
            staged_files,
            removed_files,
            workspace_changeset,
            untracked_files,
        })
    }
}
