//! Commit object
//!
//! A commit is an immutable snapshot of every tracked path, mapping each one
//! to the digest of the blob holding its content. Commits link to their
//! parents by digest:
//! - the initial commit has none and is identical in every repository
//! - a regular commit has one
//! - a merge commit has two, the second being the merged-in branch tip
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! date <unix-seconds> <timezone>
//! parent <parent-sha>
//! track <blob-sha> <path>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::staged::Staged;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, Utc};
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Message of the root commit shared by every repository
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

/// Environment variable pinning the timestamp of new commits
pub const COMMIT_DATE_ENV: &str = "TWIG_COMMIT_DATE";

pub type TrackedFiles = BTreeMap<PathBuf, ObjectId>;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit IDs (empty for the initial commit, two for merge commits)
    parents: Vec<ObjectId>,
    /// Tracked paths mapped to their blob IDs
    tracked: TrackedFiles,
    timestamp: DateTime<FixedOffset>,
    message: String,
}

impl Commit {
    pub fn new(
        parents: Vec<ObjectId>,
        tracked: TrackedFiles,
        timestamp: DateTime<FixedOffset>,
        message: String,
    ) -> Self {
        Commit {
            parents,
            tracked,
            timestamp,
            message,
        }
    }

    /// The root of every history: fixed message, Unix epoch, nothing tracked
    pub fn initial() -> Self {
        Commit {
            parents: Vec::new(),
            tracked: TrackedFiles::new(),
            timestamp: DateTime::<Utc>::default().fixed_offset(),
            message: INITIAL_COMMIT_MESSAGE.to_string(),
        }
    }

    /// Fold the staged changes into a child of this commit
    ///
    /// `self` is left untouched: the child gets its own copy of the tracked
    /// files with every staged addition applied and every tombstone removed.
    pub fn derive(
        &self,
        staged: &Staged,
        message: &str,
        timestamp: DateTime<FixedOffset>,
    ) -> anyhow::Result<Commit> {
        let mut tracked = self.tracked.clone();
        for (path, change) in staged.entries() {
            match change {
                Some(oid) => {
                    tracked.insert(path.clone(), oid.clone());
                }
                None => {
                    tracked.remove(path);
                }
            }
        }

        Ok(Commit::new(
            vec![self.object_id()?],
            tracked,
            timestamp,
            message.to_string(),
        ))
    }

    /// Like [`Commit::derive`], recording `other` as the second parent
    pub fn derive_merge(
        &self,
        staged: &Staged,
        message: &str,
        timestamp: DateTime<FixedOffset>,
        other: ObjectId,
    ) -> anyhow::Result<Commit> {
        let mut commit = self.derive(staged, message, timestamp)?;
        commit.parents.push(other);

        Ok(commit)
    }

    /// Timestamp for a new commit: `TWIG_COMMIT_DATE` if set, else now
    ///
    /// Accepts RFC 2822 dates and `%Y-%m-%d %H:%M:%S %z`.
    pub fn timestamp_from_env() -> anyhow::Result<DateTime<FixedOffset>> {
        match std::env::var(COMMIT_DATE_ENV) {
            Ok(date_str) => DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .with_context(|| format!("invalid {COMMIT_DATE_ENV}: {date_str}")),
            Err(_) => Ok(chrono::Local::now().fixed_offset()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Timestamp in the form `Thu Jan 1 00:00:00 1970 +0000`
    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format("%a %b %-d %H:%M:%S %Y %z").to_string()
    }

    pub fn tracked(&self) -> &TrackedFiles {
        &self.tracked
    }

    pub fn tracked_blob(&self, path: &Path) -> Option<&ObjectId> {
        self.tracked.get(path)
    }

    pub fn is_tracked(&self, path: &Path) -> bool {
        self.tracked.contains_key(path)
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn second_parent(&self) -> Option<&ObjectId> {
        self.parents.get(1)
    }

    pub fn is_initial(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    fn content_lines(&self) -> anyhow::Result<Vec<String>> {
        let mut lines = vec![format!(
            "date {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )];
        for parent in &self.parents {
            lines.push(format!("parent {}", parent));
        }
        for (path, oid) in &self.tracked {
            lines.push(format!("track {} {}", oid, path_to_line(path)?));
        }
        lines.push(String::new());
        lines.push(self.message.to_string());

        Ok(lines)
    }
}

/// Render a tracked path for a line-oriented object body
pub(crate) fn path_to_line(path: &Path) -> anyhow::Result<&str> {
    let line = path
        .to_str()
        .with_context(|| format!("path is not valid UTF-8: {}", path.display()))?;
    if line.is_empty() || line.contains('\n') {
        anyhow::bail!("path cannot be stored: {:?}", line);
    }

    Ok(line)
}

fn parse_offset(timezone: &str) -> anyhow::Result<FixedOffset> {
    let (sign, digits) = match timezone.split_at_checked(1) {
        Some(("+", digits)) => (1, digits),
        Some(("-", digits)) => (-1, digits),
        _ => anyhow::bail!("Invalid timezone: {timezone}"),
    };
    if digits.len() != 4 {
        anyhow::bail!("Invalid timezone: {timezone}");
    }

    let hours = digits[..2].parse::<i32>().context("Invalid timezone hours")?;
    let minutes = digits[2..].parse::<i32>().context("Invalid timezone minutes")?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .with_context(|| format!("Invalid timezone: {timezone}"))
}

fn parse_date_line(line: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    let (seconds, timezone) = line
        .strip_prefix("date ")
        .and_then(|rest| rest.split_once(' '))
        .context("Invalid commit object: invalid date line")?;
    let seconds = seconds.parse::<i64>().context("Invalid timestamp")?;
    let offset = parse_offset(timezone)?;

    let utc = DateTime::from_timestamp(seconds, 0).context("Invalid timestamp")?;
    Ok(utc.with_timezone(&offset))
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let object_content = self.content_lines()?.join("\n");
        frame(self.object_type(), object_content.as_bytes())
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        let content = String::from_utf8(content)?;
        // `\n` only: a `\r` belongs to the message or path it follows
        let mut lines = content.split('\n');

        let date_line = lines
            .next()
            .context("Invalid commit object: missing date line")?;
        let timestamp = parse_date_line(date_line)?;

        let mut parents = Vec::new();
        let mut tracked = TrackedFiles::new();
        let mut next_line = lines.next().unwrap_or_default();

        while let Some(parent_oid) = next_line.strip_prefix("parent ") {
            parents.push(ObjectId::try_parse(parent_oid.to_string())?);
            next_line = lines.next().unwrap_or_default();
        }

        while let Some(track) = next_line.strip_prefix("track ") {
            let (oid, path) = track
                .split_once(' ')
                .context("Invalid commit object: invalid track line")?;
            tracked.insert(PathBuf::from(path), ObjectId::try_parse(oid.to_string())?);
            next_line = lines.next().unwrap_or_default();
        }

        if !next_line.is_empty() {
            anyhow::bail!("Invalid commit object: unexpected line {:?}", next_line);
        }

        let message = lines.collect::<Vec<&str>>().join("\n");
        Ok(Self::new(parents, tracked, timestamp, message))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        self.content_lines()
            .map(|lines| lines.join("\n"))
            .unwrap_or_default()
    }
}
