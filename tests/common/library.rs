use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use rstest::fixture;
use std::cell::RefCell;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;
use twig::areas::repository::Repository;
use twig::artifacts::objects::commit::Commit;
use twig::artifacts::objects::object_id::ObjectId;
use twig::errors::RepositoryError;

/// Writer capturing everything a repository prints
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// An initialized repository in a temp dir, driven through the library API
pub struct TestRepository {
    pub dir: TempDir,
    pub repository: Repository,
    output: SharedBuffer,
}

impl TestRepository {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, path: &str, content: &str) {
        write_file(FileSpec::new(self.path().join(path), content.to_string()));
    }

    pub fn read(&self, path: &str) -> String {
        read_file(&self.path().join(path))
    }

    pub fn delete(&self, path: &str) {
        std::fs::remove_file(self.path().join(path)).expect("Failed to delete file");
    }

    pub fn exists(&self, path: &str) -> bool {
        self.path().join(path).is_file()
    }

    /// Everything printed since the last call
    pub fn take_output(&self) -> String {
        let bytes = std::mem::take(&mut *self.output.0.borrow_mut());
        String::from_utf8(bytes).expect("output is not UTF-8")
    }

    /// Write, stage and commit each `(path, content)` pair
    pub fn commit_files(&mut self, files: &[(&str, &str)], message: &str) -> ObjectId {
        for (path, content) in files {
            self.write(path, content);
            self.repository.add(path).expect("add failed");
        }

        self.repository.commit(message).expect("commit failed")
    }

    pub fn head(&self) -> (ObjectId, Commit) {
        self.repository.head_commit().expect("HEAD does not resolve")
    }

    pub fn object_count(&self) -> usize {
        self.repository
            .database()
            .list()
            .expect("Failed to list objects")
            .len()
    }
}

#[fixture]
pub fn repository() -> TestRepository {
    colored::control::set_override(false);

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = SharedBuffer::default();
    let mut repository = Repository::new(
        &dir.path().to_string_lossy(),
        Box::new(output.clone()),
    )
    .expect("Failed to open repository");
    repository.init().expect("Failed to initialize repository");

    let test_repository = TestRepository {
        dir,
        repository,
        output,
    };
    test_repository.take_output();

    test_repository
}

pub fn repository_error(error: &anyhow::Error) -> &RepositoryError {
    error
        .downcast_ref::<RepositoryError>()
        .unwrap_or_else(|| panic!("not a repository error: {error:#}"))
}

pub fn assert_invalid_state(result: anyhow::Result<impl std::fmt::Debug>, message: &str) {
    let error = result.expect_err("operation should have failed");
    match repository_error(&error) {
        RepositoryError::InvalidState(actual) => assert_eq!(actual, message),
        other => panic!("expected InvalidState({message:?}), got {other:?}"),
    }
}

pub fn assert_not_found(result: anyhow::Result<impl std::fmt::Debug>, message: &str) {
    let error = result.expect_err("operation should have failed");
    match repository_error(&error) {
        RepositoryError::NotFound(actual) => assert_eq!(actual, message),
        other => panic!("expected NotFound({message:?}), got {other:?}"),
    }
}
