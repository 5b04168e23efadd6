use crate::common::library::{TestRepository, repository};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::PathBuf;

#[rstest]
fn adding_the_same_content_twice_matches_adding_it_once(mut repository: TestRepository) {
    repository.write("notes.txt", "first draft\n");

    repository.repository.add("notes.txt").unwrap();
    let once = repository.repository.load_staged().unwrap();
    let objects_after_once = repository.object_count();

    repository.repository.add("notes.txt").unwrap();
    let twice = repository.repository.load_staged().unwrap();

    assert_eq!(once, twice);
    assert_eq!(repository.object_count(), objects_after_once);
    assert!(twice.is_staged_for_addition(&PathBuf::from("notes.txt")));
}

#[rstest]
fn restaging_committed_content_unstages_the_file(mut repository: TestRepository) {
    repository.commit_files(&[("notes.txt", "v1\n")], "add notes");

    repository.write("notes.txt", "v2\n");
    repository.repository.add("notes.txt").unwrap();
    assert!(!repository.repository.load_staged().unwrap().is_empty());

    repository.write("notes.txt", "v1\n");
    repository.repository.add("notes.txt").unwrap();

    assert!(repository.repository.load_staged().unwrap().is_empty());
}

#[rstest]
fn adding_a_file_staged_for_removal_cancels_the_removal(mut repository: TestRepository) {
    repository.commit_files(&[("notes.txt", "v1\n")], "add notes");

    repository.repository.rm("notes.txt").unwrap();
    assert!(!repository.exists("notes.txt"));

    repository.write("notes.txt", "v1\n");
    repository.repository.add("notes.txt").unwrap();

    assert!(repository.repository.load_staged().unwrap().is_empty());
}

#[rstest]
fn restaging_modified_content_replaces_the_previous_entry(mut repository: TestRepository) {
    repository.write("notes.txt", "v1\n");
    repository.repository.add("notes.txt").unwrap();
    repository.write("notes.txt", "v2\n");
    repository.repository.add("notes.txt").unwrap();

    let staged = repository.repository.load_staged().unwrap();
    let blob_oid = staged
        .get(&PathBuf::from("notes.txt"))
        .cloned()
        .flatten()
        .unwrap();
    let blob = repository.repository.database().load_blob(&blob_oid).unwrap();

    assert_eq!(staged.entries().count(), 1);
    assert_eq!(blob.content().as_ref(), b"v2\n");
}

#[rstest]
fn files_in_subdirectories_are_staged_by_relative_path(mut repository: TestRepository) {
    repository.write("src/lib.rs", "pub fn answer() -> u8 { 42 }\n");

    repository.repository.add("./src/../src/lib.rs").unwrap();

    let staged = repository.repository.load_staged().unwrap();
    assert_eq!(
        staged.entries().map(|(path, _)| path.clone()).collect::<Vec<_>>(),
        vec![PathBuf::from("src/lib.rs")]
    );
}
