//! Blob object
//!
//! Blobs store the bytes of a single file version, without its name. The
//! digest of a blob depends on nothing but those bytes, which is what lets
//! identical files share one stored object.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

/// Markers framing the two sides of a merge conflict
pub const CONFLICT_HEAD_MARKER: &str = "<<<<<<< HEAD\n";
pub const CONFLICT_SEPARATOR: &str = "=======\n";
pub const CONFLICT_TAIL_MARKER: &str = ">>>>>>>\n";

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Build the blob recorded for a conflicting path
    ///
    /// The current branch's version comes first, then the merged-in branch's
    /// version. A side that deleted the file contributes no content.
    pub fn conflict(current: Option<&Blob>, given: Option<&Blob>) -> Self {
        let current = current.map(|blob| blob.content().as_ref()).unwrap_or_default();
        let given = given.map(|blob| blob.content().as_ref()).unwrap_or_default();

        let mut content = Vec::with_capacity(current.len() + given.len() + 32);
        content.extend_from_slice(CONFLICT_HEAD_MARKER.as_bytes());
        content.extend_from_slice(current);
        content.extend_from_slice(CONFLICT_SEPARATOR.as_bytes());
        content.extend_from_slice(given);
        content.extend_from_slice(CONFLICT_TAIL_MARKER.as_bytes());

        Self::new(content.into())
    }
}

impl From<&str> for Blob {
    fn from(content: &str) -> Self {
        Self::new(Bytes::copy_from_slice(content.as_bytes()))
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        frame(self.object_type(), &self.content)
    }
}

impl Unpackable for Blob {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        Ok(Self::new(content.into()))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}
