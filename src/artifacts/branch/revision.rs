use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::{ANCESTOR_REGEX, PARENT_REGEX, REF_ALIASES};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::RepositoryError;
use anyhow::Context;

/// Message reported for any revision that does not name a commit
pub const UNKNOWN_COMMIT_MESSAGE: &str = "No commit with that id exists.";

/// A way of naming a commit
///
/// Supports:
/// - `HEAD` and its alias `@`
/// - branch names: `master`, `feature/login`
/// - full or abbreviated commit digests, used when no branch has that name
/// - `<revision>^` for the first parent and `<revision>~<n>` for the nth
///   first-parent ancestor
#[derive(Debug, Clone)]
pub enum Revision {
    /// HEAD, a branch, or potentially a digest (decided during resolution)
    Ref(BranchName),
    /// The Nth first-parent ancestor of a revision (e.g., HEAD~3)
    Ancestor(Box<Revision>, usize),
    /// The first parent of a revision (e.g., HEAD^)
    Parent(Box<Revision>),
}

impl Revision {
    pub fn try_parse(revision: &str) -> anyhow::Result<Revision> {
        let parent_regex = regex::Regex::new(PARENT_REGEX)
            .with_context(|| format!("invalid parent regex: {PARENT_REGEX}"))?;
        let ancestor_regex = regex::Regex::new(ANCESTOR_REGEX)
            .with_context(|| format!("invalid ancestor regex: {ANCESTOR_REGEX}"))?;

        if let Some(caps) = parent_regex.captures(revision) {
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Parent(Box::new(base_revision)))
        } else if let Some(caps) = ancestor_regex.captures(revision) {
            let generations: usize = caps[2]
                .parse()
                .with_context(|| format!("failed to parse generations in revision: {revision}"))?;
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Ancestor(Box::new(base_revision), generations))
        } else {
            let resolved_name = *REF_ALIASES.get(revision).unwrap_or(&revision);
            let branch_name = BranchName::try_parse(resolved_name.to_string())
                .map_err(|_| RepositoryError::not_found(UNKNOWN_COMMIT_MESSAGE))?;

            Ok(Revision::Ref(branch_name))
        }
    }

    /// Resolve to the digest of a stored commit
    pub fn resolve(&self, repository: &Repository) -> anyhow::Result<ObjectId> {
        match self {
            Revision::Ref(name) => Self::resolve_ref(name, repository),
            Revision::Parent(base_revision) => {
                Self::resolve_commit_parent(&base_revision.resolve(repository)?, repository)
            }
            Revision::Ancestor(base_revision, generations) => {
                let mut oid = base_revision.resolve(repository)?;
                for _ in 0..*generations {
                    oid = Self::resolve_commit_parent(&oid, repository)?;
                }

                Ok(oid)
            }
        }
    }

    fn resolve_ref(name: &BranchName, repository: &Repository) -> anyhow::Result<ObjectId> {
        if name.as_ref() == HEAD_REF_NAME {
            return repository
                .refs()
                .read_head()?
                .ok_or_else(|| RepositoryError::not_found(UNKNOWN_COMMIT_MESSAGE).into());
        }

        // branches win over digests
        if let Some(oid) = repository.refs().read_branch(name)? {
            return Ok(oid);
        }

        Self::resolve_oid(name.as_ref(), repository)
    }

    fn resolve_commit_parent(oid: &ObjectId, repository: &Repository) -> anyhow::Result<ObjectId> {
        repository
            .database()
            .load_commit(oid)?
            .parent()
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(UNKNOWN_COMMIT_MESSAGE).into())
    }

    fn resolve_oid(oid_str: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        // only commits are candidates, blobs sharing the prefix do not make it ambiguous
        repository
            .database()
            .resolve_abbreviation(oid_str, Some(ObjectType::Commit))?
            .ok_or_else(|| RepositoryError::not_found(UNKNOWN_COMMIT_MESSAGE).into())
    }
}
