use crate::common::command::{init_repository_dir, run_twig_command};
use crate::common::library::{TestRepository, assert_invalid_state, repository};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use twig::artifacts::branch::branch_name::BranchName;

#[rstest]
fn new_branch_points_at_head_without_switching(mut repository: TestRepository) {
    let head_oid = repository.commit_files(&[("a.txt", "a\n")], "first");

    repository.repository.branch("feature/login").unwrap();

    let feature = BranchName::try_parse("feature/login".to_string()).unwrap();
    assert_eq!(
        repository.repository.refs().read_branch(&feature).unwrap(),
        Some(head_oid)
    );
    assert_eq!(
        repository.repository.refs().current_branch().unwrap(),
        BranchName::default_branch()
    );
}

#[rstest]
fn branches_diverge_after_new_commits(mut repository: TestRepository) {
    let base = repository.commit_files(&[("a.txt", "a\n")], "first");
    repository.repository.branch("side").unwrap();

    let advanced = repository.commit_files(&[("a.txt", "b\n")], "second");

    let side = BranchName::try_parse("side".to_string()).unwrap();
    assert_eq!(repository.repository.refs().read_branch(&side).unwrap(), Some(base));
    assert_eq!(repository.head().0, advanced);
}

#[rstest]
fn duplicate_branches_are_rejected(mut repository: TestRepository) {
    repository.repository.branch("side").unwrap();

    assert_invalid_state(
        repository.repository.branch("side"),
        "A branch with that name already exists.",
    );
    assert_invalid_state(
        repository.repository.branch("master"),
        "A branch with that name already exists.",
    );
}

#[rstest]
#[case("")]
#[case("with space")]
#[case("double..dot")]
#[case("ends.lock")]
#[case("trailing/")]
fn invalid_branch_names_are_rejected(mut repository: TestRepository, #[case] name: &str) {
    assert!(repository.repository.branch(name).is_err());
    assert_eq!(repository.repository.refs().list_branches().unwrap().len(), 1);
}

#[rstest]
fn cli_lists_new_branches_in_status(init_repository_dir: TempDir) {
    run_twig_command(init_repository_dir.path(), &["branch", "alpha"])
        .assert()
        .success();

    run_twig_command(init_repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "=== Branches ===\nalpha\n*master\n\n",
        ));
}
