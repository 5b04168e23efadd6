//! Object database
//!
//! Content-addressed storage for blobs, commits and staged indexes. Objects are
//! zlib-compressed and written to `objects/<2 hex>/<38 hex>` through a temp
//! file and a rename, so a reader never sees a half-written object. Storing an
//! object that already exists is a no-op.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::staged::Staged;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{BufRead, BufReader, Cursor, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Persist `object` and return its digest
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        // write the object to disk unless it already exists
        if !object_path.exists() {
            let object_dir = object_path
                .parent()
                .context(format!("Invalid object path {}", object_path.display()))?;
            std::fs::create_dir_all(object_dir)
                .map_err(RepositoryError::file_system(object_dir))?;

            self.write_object(object_path, object.serialize()?)?;
        }

        Ok(object_id)
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());
        if !object_path.is_file() {
            return Err(RepositoryError::not_found(format!("object {} not found", object_id)).into());
        }

        self.read_object(object_path)
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> anyhow::Result<ObjectBox> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(object_reader)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(
                object_reader,
            )?))),
            ObjectType::Staged => Ok(ObjectBox::Staged(Box::new(Staged::deserialize(
                object_reader,
            )?))),
        }
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Option<Blob>> {
        match self.parse_object(object_id)? {
            ObjectBox::Blob(blob) => Ok(Some(*blob)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        match self.parse_object(object_id)? {
            ObjectBox::Commit(commit) => Ok(Some(*commit)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_staged(&self, object_id: &ObjectId) -> anyhow::Result<Option<Staged>> {
        match self.parse_object(object_id)? {
            ObjectBox::Staged(staged) => Ok(Some(*staged)),
            _ => Ok(None),
        }
    }

    /// Load a commit, treating any other object type as missing
    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        self.parse_object_as_commit(object_id)?.ok_or_else(|| {
            RepositoryError::not_found(format!("object {} is not a commit", object_id)).into()
        })
    }

    /// Load a blob, treating any other object type as missing
    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        self.parse_object_as_blob(object_id)?.ok_or_else(|| {
            RepositoryError::not_found(format!("object {} is not a blob", object_id)).into()
        })
    }

    /// Type of a stored object, inflating only its header
    pub fn get_object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let object_path = self.path.join(object_id.to_path());
        if !object_path.is_file() {
            return Err(RepositoryError::not_found(format!("object {} not found", object_id)).into());
        }

        let file =
            std::fs::File::open(&object_path).map_err(RepositoryError::file_system(&object_path))?;
        let mut header_reader = BufReader::new(flate2::read::ZlibDecoder::new(file));

        ObjectType::parse_object_type(&mut header_reader)
            .with_context(|| format!("Unable to read object header {}", object_path.display()))
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_content = self.load(object_id)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)?;

        Ok((object_type, object_reader))
    }

    /// Delete a stored object
    ///
    /// Objects are otherwise immutable; this only backs staging compaction.
    pub fn remove(&self, object_id: &ObjectId) -> anyhow::Result<()> {
        let object_path = self.path.join(object_id.to_path());
        std::fs::remove_file(&object_path).map_err(RepositoryError::file_system(&object_path))?;

        if let Some(parent) = object_path.parent()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).map_err(RepositoryError::file_system(parent))?;
        }

        Ok(())
    }

    /// Enumerate every stored object
    pub fn list(&self) -> anyhow::Result<Vec<ObjectId>> {
        self.find_objects_by_prefix("")
    }

    /// Find all objects whose ID starts with `prefix`
    ///
    /// For prefixes of 2+ characters only the matching shard directory is
    /// read; shorter prefixes scan every shard.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        let mut matches = Vec::new();

        if !self.path.is_dir() || (!prefix.is_empty() && !ObjectId::is_valid_prefix(&prefix)) {
            return Ok(matches);
        }

        let shards = if prefix.len() >= 2 {
            vec![prefix[..2].to_string()]
        } else {
            std::fs::read_dir(&self.path)
                .map_err(RepositoryError::file_system(self.path.to_path_buf()))?
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_dir())
                .map(|entry| entry.file_name().to_string_lossy().to_string())
                .filter(|name| name.len() == 2)
                .collect::<Vec<_>>()
        };

        for shard in shards {
            let dir_path = self.path.join(&shard);
            if !dir_path.is_dir() {
                continue;
            }

            for entry in std::fs::read_dir(&dir_path).map_err(RepositoryError::file_system(&dir_path))? {
                let entry = entry?;
                let full_oid = format!("{}{}", shard, entry.file_name().to_string_lossy());

                // temp files and strays do not parse as object IDs
                if let Ok(oid) = ObjectId::try_parse(full_oid)
                    && oid.starts_with(&prefix)
                {
                    matches.push(oid);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }

    /// The single object of `object_type` (any type if `None`) whose digest
    /// starts with `prefix`
    ///
    /// Objects of other types sharing the prefix are ignored. Several matches
    /// are an [`RepositoryError::AmbiguousReference`], none is `Ok(None)`.
    pub fn resolve_abbreviation(
        &self,
        prefix: &str,
        object_type: Option<ObjectType>,
    ) -> anyhow::Result<Option<ObjectId>> {
        if !ObjectId::is_valid_prefix(prefix) {
            return Ok(None);
        }

        let mut matches = Vec::new();
        for oid in self.find_objects_by_prefix(prefix)? {
            if let Some(object_type) = &object_type
                && &self.get_object_type(&oid)? != object_type
            {
                continue;
            }

            matches.push(oid);
        }

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => Err(RepositoryError::AmbiguousReference {
                prefix: prefix.to_string(),
                candidates: matches.iter().map(ToString::to_string).collect(),
            }
            .into()),
        }
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content =
            std::fs::read(&object_path).map_err(RepositoryError::file_system(&object_path))?;

        Self::decompress(object_content.into())
            .with_context(|| format!("Unable to read object file {}", object_path.display()))
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .map_err(RepositoryError::file_system(&temp_object_path))?;

        file.write_all(&object_content)
            .map_err(RepositoryError::file_system(&temp_object_path))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path)
            .map_err(RepositoryError::file_system(&object_path))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
