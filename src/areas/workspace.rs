use crate::artifacts::objects::blob::Blob;
use crate::errors::RepositoryError;
use bytes::Bytes;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Directory holding repository metadata, never part of the working tree
pub const REPOSITORY_DIR: &str = ".twig";

const IGNORED_PATHS: [&str; 3] = [REPOSITORY_DIR, ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse_blob(&self, path: &Path) -> anyhow::Result<Blob> {
        let data = self.read_file(path)?;
        Ok(Blob::new(data))
    }

    /// Every regular file of the working tree, relative to its root and sorted
    pub fn list_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = WalkDir::new(&self.path)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !Self::is_ignored_name(entry.file_name()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(&*self.path)
                    .ok()
                    .map(Path::to_path_buf)
            })
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    /// Turn a user supplied path into a path relative to the working tree root
    ///
    /// The result never escapes the root and never points inside the
    /// repository directory. The file itself does not have to exist.
    pub fn relative_path(&self, path: &Path) -> anyhow::Result<PathBuf> {
        let outside = || {
            RepositoryError::invalid_state(format!(
                "Path is outside the working tree: {}",
                path.display()
            ))
        };

        let path = if path.is_absolute() {
            path.strip_prefix(&*self.path).map_err(|_| outside())?
        } else {
            path
        };

        let mut normalized = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(name) => normalized.push(name),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !normalized.pop() {
                        return Err(outside().into());
                    }
                }
                Component::RootDir | Component::Prefix(_) => return Err(outside().into()),
            }
        }

        if normalized.as_os_str().is_empty() || Self::is_ignored(&normalized) {
            return Err(outside().into());
        }

        Ok(normalized)
    }

    pub fn exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(file_path);

        if !full_path.is_file() {
            return Err(RepositoryError::FileNotFound(file_path.to_path_buf()).into());
        }

        let content = std::fs::read(&full_path).map_err(RepositoryError::file_system(&full_path))?;

        Ok(Bytes::from(content))
    }

    /// Overwrite `file_path` with `data`, creating parent directories as needed
    pub fn write_file(&self, file_path: &Path, data: &[u8]) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).map_err(RepositoryError::file_system(parent))?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&full_path)
            .map_err(RepositoryError::file_system(&full_path))?;
        file.write_all(data)
            .map_err(RepositoryError::file_system(&full_path))?;

        Ok(())
    }

    /// Delete `file_path` if present, pruning directories left empty
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_file() {
            std::fs::remove_file(&full_path).map_err(RepositoryError::file_system(&full_path))?;
            self.prune_empty_parent_dirs(&full_path)?;
        }

        Ok(())
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != &*self.path
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).map_err(RepositoryError::file_system(parent))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    fn is_ignored_name(name: &std::ffi::OsStr) -> bool {
        IGNORED_PATHS.contains(&name.to_string_lossy().as_ref())
    }

    fn is_ignored(path: &Path) -> bool {
        // Check if any component of the path is in IGNORED_PATHS
        path.components().any(|component| {
            if let Component::Normal(name) = component {
                Self::is_ignored_name(name)
            } else {
                false
            }
        })
    }
}
