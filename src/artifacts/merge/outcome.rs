use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;

/// What a merge did to the current branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The given branch is already part of the current history
    AlreadyUpToDate,
    /// The current branch moved forward to the given branch tip, no commit was made
    FastForward { from: ObjectId, to: ObjectId },
    /// A merge commit was made; `conflicts` lists the paths left with markers
    Merged {
        commit: ObjectId,
        conflicts: Vec<PathBuf>,
    },
}

impl MergeOutcome {
    pub fn has_conflicts(&self) -> bool {
        matches!(self, MergeOutcome::Merged { conflicts, .. } if !conflicts.is_empty())
    }
}
