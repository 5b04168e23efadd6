use crate::common::command::{init_repository_dir, run_twig_command, twig_commit};
use crate::common::file::{FileSpec, write_file};
use crate::common::library::{TestRepository, assert_invalid_state, assert_not_found, repository};
use assert_fs::TempDir;
use predicates::prelude::{PredicateBooleanExt, predicate};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn reset_moves_the_branch_and_restores_the_tree(mut repository: TestRepository) {
    let first = repository.commit_files(&[("a.txt", "first\n")], "first");
    let second = repository.commit_files(&[("a.txt", "second\n"), ("b.txt", "b\n")], "second");
    repository.write("pending.txt", "pending\n");
    repository.repository.add("pending.txt").unwrap();

    let target = repository.repository.reset(&first.to_string()).unwrap();

    assert_eq!(target, first);
    assert_eq!(repository.head().0, first);
    assert_eq!(repository.read("a.txt"), "first\n");
    assert!(!repository.exists("b.txt"));
    assert!(repository.repository.load_staged().unwrap().is_empty());
    // the abandoned commit is still reachable by digest
    assert!(repository.repository.database().exists(&second));
}

#[rstest]
fn reset_accepts_abbreviations_and_relative_revisions(mut repository: TestRepository) {
    let first = repository.commit_files(&[("a.txt", "first\n")], "first");
    let second = repository.commit_files(&[("a.txt", "second\n")], "second");

    repository.repository.reset("HEAD~1").unwrap();
    assert_eq!(repository.head().0, first);

    repository.repository.reset(&second.to_short_oid()).unwrap();
    assert_eq!(repository.head().0, second);
    assert_eq!(repository.read("a.txt"), "second\n");
}

#[rstest]
fn reset_to_an_unknown_commit_fails(mut repository: TestRepository) {
    let (head_before, _) = repository.head();

    assert_not_found(
        repository.repository.reset("abcdef1"),
        "No commit with that id exists.",
    );
    assert_eq!(repository.head().0, head_before);
}

#[rstest]
fn reset_refuses_to_overwrite_untracked_files(mut repository: TestRepository) {
    let first = repository.commit_files(&[("a.txt", "first\n")], "first");
    repository.repository.rm("a.txt").unwrap();
    repository.repository.commit("drop a.txt").unwrap();
    repository.write("a.txt", "untracked now\n");

    assert_invalid_state(
        repository.repository.reset(&first.to_string()),
        "There is an untracked file in the way; delete it, or add and commit it first.",
    );
    assert_eq!(repository.read("a.txt"), "untracked now\n");
}

#[rstest]
fn cli_reset_by_digest(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("1.txt"), "changed\n".to_string()));
    run_twig_command(dir, &["add", "1.txt"]).assert().success();
    twig_commit(dir, "change one").assert().success();

    let output = run_twig_command(dir, &["find", "Initial files"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let initial_files = String::from_utf8(output).unwrap().trim().to_string();

    run_twig_command(dir, &["reset", &initial_files[..8]])
        .assert()
        .success();

    run_twig_command(dir, &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("change one").not());
}
