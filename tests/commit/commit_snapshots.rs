use crate::common::command::{repository_dir, run_twig_command, twig_commit};
use crate::common::file::write_generated_files;
use crate::common::library::{TestRepository, assert_not_found, repository};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::PathBuf;
use twig::artifacts::objects::object::Object;
use twig::commands::porcelain::log::NO_COMMIT_WITH_MESSAGE;

#[rstest]
fn committing_advances_the_current_branch(mut repository: TestRepository) {
    let (root_oid, _) = repository.head();

    let commit_oid = repository.commit_files(&[("a.txt", "a\n")], "first");

    let (head_oid, head_commit) = repository.head();
    assert_eq!(head_oid, commit_oid);
    assert_eq!(head_commit.parent(), Some(&root_oid));
    assert_eq!(head_commit.message(), "first");
    assert_eq!(head_commit.object_id().unwrap(), commit_oid);
    assert!(repository.repository.load_staged().unwrap().is_empty());
    assert!(repository.take_output().contains("first"));
}

#[rstest]
fn parents_are_left_untouched_by_new_commits(mut repository: TestRepository) {
    let first_oid = repository.commit_files(&[("a.txt", "a\n")], "first");
    let first_before = repository.repository.database().load_commit(&first_oid).unwrap();

    repository.commit_files(&[("a.txt", "changed\n"), ("b.txt", "b\n")], "second");

    let first_after = repository.repository.database().load_commit(&first_oid).unwrap();
    assert_eq!(first_before, first_after);
    assert_eq!(
        first_after.tracked().keys().cloned().collect::<Vec<_>>(),
        vec![PathBuf::from("a.txt")]
    );
}

#[rstest]
fn untouched_files_carry_over_to_the_next_commit(mut repository: TestRepository) {
    repository.commit_files(&[("a.txt", "a\n"), ("b.txt", "b\n")], "first");
    let (_, first) = repository.head();

    repository.commit_files(&[("b.txt", "b2\n")], "second");
    let (_, second) = repository.head();

    assert_eq!(
        first.tracked_blob(&PathBuf::from("a.txt")),
        second.tracked_blob(&PathBuf::from("a.txt"))
    );
    assert_ne!(
        first.tracked_blob(&PathBuf::from("b.txt")),
        second.tracked_blob(&PathBuf::from("b.txt"))
    );
}

#[rstest]
fn messages_are_stored_as_given(mut repository: TestRepository) {
    let commit_oid = repository.commit_files(&[("a.txt", "a\n")], "  padded message \n");

    let (_, head_commit) = repository.head();
    assert_eq!(head_commit.message(), "  padded message \n");
    assert_eq!(
        repository.repository.find("  padded message \n").unwrap(),
        vec![commit_oid]
    );
    assert_not_found(repository.repository.find("padded message"), NO_COMMIT_WITH_MESSAGE);
}

#[rstest]
fn identical_content_is_stored_once(mut repository: TestRepository) {
    repository.write("one.txt", "same bytes\n");
    repository.write("two.txt", "same bytes\n");
    let objects_before = repository.object_count();

    repository.repository.add("one.txt").unwrap();
    repository.repository.add("two.txt").unwrap();

    let staged = repository.repository.load_staged().unwrap();
    let blobs = staged.additions().map(|(_, oid)| oid.clone()).collect::<Vec<_>>();
    assert_eq!(blobs[0], blobs[1]);
    // one blob plus one staging index per add
    assert_eq!(repository.object_count(), objects_before + 3);
}

#[rstest]
fn cli_commits_generated_files(repository_dir: TempDir) {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let files = write_generated_files(repository_dir.path(), 4);
    for file in &files {
        let name = file.path.file_name().unwrap().to_string_lossy().to_string();
        run_twig_command(repository_dir.path(), &["add", &name])
            .assert()
            .success();
    }

    twig_commit(repository_dir.path(), "generated files")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[master [0-9a-f]{7}\] generated files\n$").unwrap());

    run_twig_command(repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "=== Staged Files ===\n\n=== Removed Files ===\n\n",
        ))
        .stdout(predicate::str::contains("=== Untracked Files ===\n\n"));
}
