use crate::common::command::{init_repository_dir, run_twig_command, twig_commit};
use crate::common::file::{FileSpec, read_file, write_file};
use crate::common::library::{TestRepository, assert_invalid_state, assert_not_found, repository};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use twig::artifacts::branch::branch_name::BranchName;

#[rstest]
fn switching_branches_replaces_the_working_tree(mut repository: TestRepository) {
    repository.commit_files(&[("shared.txt", "base\n")], "base");
    repository.repository.branch("side").unwrap();
    repository.repository.checkout_branch("side").unwrap();
    repository.commit_files(
        &[("shared.txt", "side\n"), ("nested/side_only.txt", "side only\n")],
        "on side",
    );
    repository.repository.checkout_branch("master").unwrap();
    repository.commit_files(&[("master_only.txt", "master only\n")], "on master");

    repository.repository.checkout_branch("side").unwrap();

    assert_eq!(
        repository.repository.refs().current_branch().unwrap(),
        BranchName::try_parse("side".to_string()).unwrap()
    );
    assert_eq!(repository.read("shared.txt"), "side\n");
    assert_eq!(repository.read("nested/side_only.txt"), "side only\n");
    assert!(!repository.exists("master_only.txt"));

    repository.repository.checkout_branch("master").unwrap();

    assert_eq!(repository.read("shared.txt"), "base\n");
    assert!(repository.exists("master_only.txt"));
    assert!(!repository.exists("nested/side_only.txt"));
    assert!(!repository.path().join("nested").exists());
}

#[rstest]
fn switching_branches_clears_the_staging_area(mut repository: TestRepository) {
    repository.repository.branch("side").unwrap();
    repository.write("pending.txt", "pending\n");
    repository.repository.add("pending.txt").unwrap();

    repository.repository.checkout_branch("side").unwrap();

    assert!(repository.repository.load_staged().unwrap().is_empty());
    // untracked by both commits, so left alone
    assert!(repository.exists("pending.txt"));
}

#[rstest]
fn checking_out_the_current_branch_is_rejected(mut repository: TestRepository) {
    assert_invalid_state(
        repository.repository.checkout_branch("master"),
        "No need to checkout the current branch.",
    );
}

#[rstest]
fn checking_out_a_missing_branch_is_rejected(mut repository: TestRepository) {
    assert_not_found(
        repository.repository.checkout_branch("nowhere"),
        "No such branch exists.",
    );
}

#[rstest]
fn untracked_files_in_the_way_abort_the_checkout(mut repository: TestRepository) {
    repository.repository.branch("side").unwrap();
    repository.repository.checkout_branch("side").unwrap();
    repository.commit_files(&[("clash.txt", "from side\n")], "on side");
    repository.repository.checkout_branch("master").unwrap();
    repository.write("clash.txt", "local work\n");

    assert_invalid_state(
        repository.repository.checkout_branch("side"),
        "There is an untracked file in the way; delete it, or add and commit it first.",
    );

    assert_eq!(repository.read("clash.txt"), "local work\n");
    assert_eq!(
        repository.repository.refs().current_branch().unwrap(),
        BranchName::default_branch()
    );
}

#[rstest]
fn cli_switches_branches(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_twig_command(dir, &["branch", "side"]).assert().success();
    run_twig_command(dir, &["checkout", "side"]).assert().success();
    write_file(FileSpec::new(dir.join("1.txt"), "side one\n".to_string()));
    run_twig_command(dir, &["add", "1.txt"]).assert().success();
    twig_commit(dir, "side change").assert().success();

    run_twig_command(dir, &["checkout", "master"]).assert().success();
    assert_eq!(read_file(&dir.join("1.txt")), "one\n");

    run_twig_command(dir, &["checkout", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No such branch exists."));
}
