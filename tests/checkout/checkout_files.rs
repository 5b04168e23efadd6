use crate::common::command::{init_repository_dir, run_twig_command};
use crate::common::file::{FileSpec, read_file, write_file};
use crate::common::library::{TestRepository, assert_not_found, repository};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn restoring_from_head_discards_local_edits(mut repository: TestRepository) {
    repository.commit_files(&[("a.txt", "committed\n")], "first");
    repository.write("a.txt", "scribbles\n");

    repository.repository.checkout_file(None, "a.txt").unwrap();

    assert_eq!(repository.read("a.txt"), "committed\n");
    assert!(repository.repository.load_staged().unwrap().is_empty());
}

#[rstest]
fn restoring_from_an_abbreviated_commit(mut repository: TestRepository) {
    let old = repository.commit_files(&[("a.txt", "old\n")], "old");
    repository.commit_files(&[("a.txt", "new\n")], "new");
    let (head_before, _) = repository.head();

    let short = old.to_short_oid();
    repository.repository.checkout_file(Some(&short), "a.txt").unwrap();

    assert_eq!(repository.read("a.txt"), "old\n");
    assert_eq!(repository.head().0, head_before);
    assert!(repository.repository.load_staged().unwrap().is_empty());
}

#[rstest]
#[case("HEAD^")]
#[case("HEAD~1")]
#[case("@^")]
fn restoring_from_relative_revisions(mut repository: TestRepository, #[case] revision: &str) {
    repository.commit_files(&[("a.txt", "old\n")], "old");
    repository.commit_files(&[("a.txt", "new\n")], "new");

    repository.repository.checkout_file(Some(revision), "a.txt").unwrap();

    assert_eq!(repository.read("a.txt"), "old\n");
}

#[rstest]
fn restoring_a_file_missing_from_the_commit_fails(mut repository: TestRepository) {
    repository.commit_files(&[("a.txt", "a\n")], "first");

    assert_not_found(
        repository.repository.checkout_file(None, "missing.txt"),
        "File does not exist in that commit.",
    );
}

#[rstest]
#[case("0000000")]
#[case("zzzz")]
fn restoring_from_an_unknown_commit_fails(mut repository: TestRepository, #[case] revision: &str) {
    repository.commit_files(&[("a.txt", "a\n")], "first");

    assert_not_found(
        repository.repository.checkout_file(Some(revision), "a.txt"),
        "No commit with that id exists.",
    );
}

#[rstest]
fn cli_restores_files_after_double_dash(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("a/2.txt"), "edited\n".to_string()));

    run_twig_command(dir, &["checkout", "--", "a/2.txt"])
        .assert()
        .success();
    assert_eq!(read_file(&dir.join("a/2.txt")), "two\n");

    run_twig_command(dir, &["checkout", "master", "--", "1.txt"])
        .assert()
        .success();
    assert_eq!(read_file(&dir.join("1.txt")), "one\n");
}
