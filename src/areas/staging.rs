//! The live staging index
//!
//! The staging index itself is a [`Staged`] object in the database. The
//! `STAGED` file next to `HEAD` holds the digest of the live one; every change
//! stores a new object and repoints the file. Superseded objects stay behind
//! until [`StagingArea::compact`] runs.

use crate::areas::database::Database;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::staged::Staged;
use crate::errors::RepositoryError;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;

/// Name of the staging pointer file
pub const STAGED_REF_NAME: &str = "STAGED";

#[derive(Debug)]
pub struct StagingArea {
    /// Path to the pointer file (typically `.twig/STAGED`)
    path: Box<Path>,
}

impl StagingArea {
    pub fn new(path: Box<Path>) -> Self {
        StagingArea { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Digest of the live staging index, if one was ever saved
    pub fn read_pointer(&self) -> anyhow::Result<Option<ObjectId>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(RepositoryError::file_system(&*self.path))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        Ok(Some(ObjectId::try_parse(content.to_string())?))
    }

    /// Load the live staging index, empty when none was saved yet
    pub fn load(&self, database: &Database) -> anyhow::Result<Staged> {
        let Some(oid) = self.read_pointer()? else {
            return Ok(Staged::default());
        };

        database.parse_object_as_staged(&oid)?.ok_or_else(|| {
            RepositoryError::invalid_state(format!(
                "{} does not point to a staging index: {}",
                STAGED_REF_NAME, oid
            ))
            .into()
        })
    }

    /// Store `staged` and make it the live staging index
    pub fn save(&self, database: &Database, staged: &Staged) -> anyhow::Result<ObjectId> {
        let oid = database.store(staged)?;

        let mut pointer_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(RepositoryError::file_system(&*self.path))?;
        let mut lock = file_guard::lock(&mut pointer_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut()
            .write_all(oid.to_string().as_bytes())
            .map_err(RepositoryError::file_system(&*self.path))?;

        Ok(oid)
    }

    /// Replace the live staging index with an empty one
    pub fn reset(&self, database: &Database) -> anyhow::Result<ObjectId> {
        self.save(database, &Staged::default())
    }

    /// Delete every stored staging index except the live one
    ///
    /// Returns how many objects were removed.
    pub fn compact(&self, database: &Database) -> anyhow::Result<usize> {
        let live = self.read_pointer()?;
        let mut removed = 0;

        for oid in database.list()? {
            if Some(&oid) == live.as_ref() {
                continue;
            }

            if database.get_object_type(&oid)? == ObjectType::Staged {
                database.remove(&oid)?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}
