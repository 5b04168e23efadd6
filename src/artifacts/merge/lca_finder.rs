//! Ancestry and lowest common ancestor (LCA) search
//!
//! The merge base of two commits is found in three passes over the commit
//! graph, each an explicit worklist:
//!
//! 1. walk every ancestor of the source commit, marking it `SOURCE`
//! 2. walk every ancestor of the target commit, marking it `TARGET`
//! 3. from the parents of every commit marked with both flags, mark all
//!    strict ancestors `STALE`
//!
//! Commits marked `SOURCE | TARGET` but not `STALE` are the lowest common
//! ancestors. Every commit is expanded at most once per pass, so
//! the search is linear in the size of the history.
//!
//! Criss-cross histories can leave several candidates. The one with the
//! latest timestamp is picked, ties going to the smallest digest.
//!
//! ## Debug Logging
//!
//! Build with `--features debug_merge` to trace visit states on stderr.

use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use chrono::{DateTime, FixedOffset};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::fmt;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b000;
        const VISITED_FROM_SOURCE = 0b001;
        const VISITED_FROM_TARGET = 0b010;
        const VISITED_FROM_BOTH = Self::VISITED_FROM_SOURCE.bits() | Self::VISITED_FROM_TARGET.bits();
        const STALE = 0b100; // strict ancestor of a common ancestor
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::VISITED_FROM_SOURCE) {
            flags.push("SOURCE");
        }
        if self.contains(VisitState::VISITED_FROM_TARGET) {
            flags.push("TARGET");
        }
        if self.contains(VisitState::STALE) {
            flags.push("STALE");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The parts of a commit the graph search needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
    pub timestamp: DateTime<FixedOffset>,
}

impl SlimCommit {
    pub fn from_commit(oid: ObjectId, commit: &Commit) -> Self {
        SlimCommit {
            oid,
            parents: commit.parents().to_vec(),
            timestamp: commit.timestamp(),
        }
    }
}

/// Ancestry queries over any commit storage
///
/// The loader maps a commit digest to its [`SlimCommit`]; a failing load
/// aborts the query.
pub struct LcaFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> LcaFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Every commit reachable from `commit_id`, itself included
    pub fn ancestors(&self, commit_id: &ObjectId) -> anyhow::Result<HashSet<ObjectId>> {
        let mut states = HashMap::new();
        self.mark_ancestors(commit_id, VisitState::VISITED_FROM_SOURCE, &mut states)?;

        Ok(states.into_keys().collect())
    }

    /// Whether `ancestor_id` is reachable from `commit_id` (or equal to it)
    pub fn is_ancestor(&self, ancestor_id: &ObjectId, commit_id: &ObjectId) -> anyhow::Result<bool> {
        Ok(self.ancestors(commit_id)?.contains(ancestor_id))
    }

    /// The lowest common ancestor of `source_commit_id` and `target_commit_id`
    ///
    /// Fails if the two commits share no history, which cannot happen for
    /// commits of the same repository.
    pub fn lowest_common_ancestor(
        &self,
        source_commit_id: &ObjectId,
        target_commit_id: &ObjectId,
    ) -> anyhow::Result<ObjectId> {
        if source_commit_id == target_commit_id {
            return Ok(source_commit_id.clone());
        }

        let mut states = HashMap::<ObjectId, VisitState>::new();
        self.mark_ancestors(source_commit_id, VisitState::VISITED_FROM_SOURCE, &mut states)?;
        self.mark_ancestors(target_commit_id, VisitState::VISITED_FROM_TARGET, &mut states)?;

        let common_ancestors = states
            .iter()
            .filter(|(_, state)| state.contains(VisitState::VISITED_FROM_BOTH))
            .map(|(oid, _)| oid.clone())
            .collect::<Vec<_>>();

        debug_log!(
            "Common ancestors of {} and {}: {}",
            source_commit_id,
            target_commit_id,
            common_ancestors
                .iter()
                .map(|oid| oid.as_ref())
                .collect::<Vec<_>>()
                .join(", ")
        );

        if common_ancestors.is_empty() {
            anyhow::bail!(
                "commits {} and {} share no common ancestor",
                source_commit_id,
                target_commit_id
            );
        }

        self.mark_stale(&common_ancestors, &mut states)?;

        debug_log!(
            "Final ancestors states: {}",
            states
                .iter()
                .map(|(oid, state)| format!("{}: {}", oid, state))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut best_common_ancestors = Vec::new();
        for oid in common_ancestors {
            if !states[&oid].contains(VisitState::STALE) {
                best_common_ancestors.push((self.commit_loader)(&oid)?);
            }
        }

        debug_log!(
            "Lowest common ancestors: {}",
            best_common_ancestors
                .iter()
                .map(|commit| commit.oid.as_ref())
                .collect::<Vec<_>>()
                .join(", ")
        );

        best_common_ancestors
            .into_iter()
            .max_by_key(|commit| (commit.timestamp, Reverse(commit.oid.clone())))
            .map(|commit| commit.oid)
            .ok_or_else(|| anyhow::anyhow!("every common ancestor was marked stale"))
    }

    /// Add `flag` to every ancestor of `start`, expanding each commit once
    fn mark_ancestors(
        &self,
        start: &ObjectId,
        flag: VisitState,
        states: &mut HashMap<ObjectId, VisitState>,
    ) -> anyhow::Result<()> {
        let mut worklist = vec![start.clone()];

        while let Some(commit_id) = worklist.pop() {
            let state = states.entry(commit_id.clone()).or_insert(VisitState::NONE);
            if state.contains(flag) {
                continue;
            }
            *state |= flag;

            debug_log!("Processing commit {}: state={}", &commit_id, state);

            let commit = (self.commit_loader)(&commit_id)?;
            worklist.extend(commit.parents);
        }

        Ok(())
    }

    /// Mark every strict ancestor of `common_ancestors` as stale
    fn mark_stale(
        &self,
        common_ancestors: &[ObjectId],
        states: &mut HashMap<ObjectId, VisitState>,
    ) -> anyhow::Result<()> {
        let mut worklist = Vec::new();
        for oid in common_ancestors {
            worklist.extend((self.commit_loader)(oid)?.parents);
        }

        while let Some(commit_id) = worklist.pop() {
            let state = states.entry(commit_id.clone()).or_insert(VisitState::NONE);
            if state.contains(VisitState::STALE) {
                continue;
            }
            *state |= VisitState::STALE;

            let commit = (self.commit_loader)(&commit_id)?;
            worklist.extend(commit.parents);
        }

        Ok(())
    }
}
