//! Staged changes (the staging index)
//!
//! A `Staged` value maps paths to pending changes relative to a commit:
//! `Some(blob)` stages an addition or modification, `None` is a tombstone
//! staging the path for removal. The live staging index of a repository is one
//! such value, stored as an object after every change. The same type doubles
//! as the result of [`Staged::delta`], the diff between two commits used by
//! merges.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! staged <size>\0
//! add <blob-sha> <path>
//! remove <path>
//! ```

use crate::artifacts::objects::commit::{Commit, path_to_line};
use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// A pending change: the new blob, or `None` for a removal
pub type StagedChange = Option<ObjectId>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Staged {
    changes: BTreeMap<PathBuf, StagedChange>,
}

impl Staged {
    /// Stage `path` with the content identified by `blob_oid`
    ///
    /// If `current` already tracks exactly that content, any pending change
    /// for the path (addition or removal) is dropped instead and `false` is
    /// returned. Otherwise the addition is recorded and `true` tells the
    /// caller the blob must be persisted.
    pub fn add(&mut self, current: &Commit, path: &Path, blob_oid: ObjectId) -> bool {
        if current.tracked_blob(path) == Some(&blob_oid) {
            self.changes.remove(path);
            false
        } else {
            self.changes.insert(path.to_path_buf(), Some(blob_oid));
            true
        }
    }

    /// Unstage a pending addition; tombstones are left alone
    pub fn remove_staged(&mut self, path: &Path) -> bool {
        if self.is_staged_for_addition(path) {
            self.changes.remove(path);
            true
        } else {
            false
        }
    }

    pub fn stage_for_removal(&mut self, path: PathBuf) {
        self.changes.insert(path, None);
    }

    pub fn insert(&mut self, path: PathBuf, change: StagedChange) {
        self.changes.insert(path, change);
    }

    pub fn get(&self, path: &Path) -> Option<&StagedChange> {
        self.changes.get(path)
    }

    pub fn is_staged_for_addition(&self, path: &Path) -> bool {
        matches!(self.changes.get(path), Some(Some(_)))
    }

    pub fn is_staged_for_removal(&self, path: &Path) -> bool {
        matches!(self.changes.get(path), Some(None))
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&PathBuf, &StagedChange)> {
        self.changes.iter()
    }

    /// Paths staged for addition, with their blobs
    pub fn additions(&self) -> impl Iterator<Item = (&PathBuf, &ObjectId)> {
        self.changes
            .iter()
            .filter_map(|(path, change)| change.as_ref().map(|oid| (path, oid)))
    }

    /// Paths staged for removal
    pub fn removals(&self) -> impl Iterator<Item = &PathBuf> {
        self.changes
            .iter()
            .filter(|(_, change)| change.is_none())
            .map(|(path, _)| path)
    }

    /// The changes that turn `base` into `derived`
    ///
    /// Paths new or different in `derived` map to its blob, paths that
    /// `derived` no longer tracks become tombstones.
    pub fn delta(base: &Commit, derived: &Commit) -> Staged {
        let mut delta = Staged::default();

        for (path, oid) in derived.tracked() {
            if base.tracked_blob(path) != Some(oid) {
                delta.changes.insert(path.clone(), Some(oid.clone()));
            }
        }

        for path in base.tracked().keys() {
            if !derived.is_tracked(path) {
                delta.changes.insert(path.clone(), None);
            }
        }

        delta
    }
}

impl Packable for Staged {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let lines = self
            .changes
            .iter()
            .map(|(path, change)| {
                let path = path_to_line(path)?;
                Ok(match change {
                    Some(oid) => format!("add {} {}", oid, path),
                    None => format!("remove {}", path),
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        frame(self.object_type(), lines.join("\n").as_bytes())
    }
}

impl Unpackable for Staged {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut staged = Staged::default();

        for line in reader.split(b'\n') {
            let line = String::from_utf8(line?)?;
            if let Some(addition) = line.strip_prefix("add ") {
                let (oid, path) = addition
                    .split_once(' ')
                    .context("Invalid staged object: invalid add line")?;
                staged.insert(PathBuf::from(path), Some(ObjectId::try_parse(oid.to_string())?));
            } else if let Some(path) = line.strip_prefix("remove ") {
                staged.stage_for_removal(PathBuf::from(path));
            } else if !line.is_empty() {
                anyhow::bail!("Invalid staged object: unexpected line {:?}", line);
            }
        }

        Ok(staged)
    }
}

impl Object for Staged {
    fn object_type(&self) -> ObjectType {
        ObjectType::Staged
    }

    fn display(&self) -> String {
        self.changes
            .iter()
            .map(|(path, change)| match change {
                Some(oid) => format!("A {} {}", oid.to_short_oid(), path.display()),
                None => format!("D {}", path.display()),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
