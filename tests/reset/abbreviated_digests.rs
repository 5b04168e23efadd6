use crate::common::library::{TestRepository, repository, repository_error};
use pretty_assertions::assert_eq;
use rstest::rstest;
use twig::artifacts::objects::blob::Blob;
use twig::artifacts::objects::object_id::ObjectId;
use twig::errors::RepositoryError;

fn hex_digits() -> impl Iterator<Item = String> {
    (0..16).map(|digit| format!("{digit:x}"))
}

#[rstest]
fn prefixes_shared_by_several_commits_are_ambiguous(mut repository: TestRepository) {
    let (initial, _) = repository.head();
    let mut commits = vec![initial];
    // 17 commits over 16 possible first digits must collide somewhere
    for i in 0..16 {
        let content = format!("{i}\n");
        commits.push(repository.commit_files(&[("counter.txt", content.as_str())], "step"));
    }
    let (head_before, _) = repository.head();

    let prefix = hex_digits()
        .find(|prefix| commits.iter().filter(|oid| oid.starts_with(prefix)).count() > 1)
        .unwrap();

    let error = repository.repository.reset(&prefix).unwrap_err();

    match repository_error(&error) {
        RepositoryError::AmbiguousReference { prefix: reported, candidates } => {
            assert_eq!(reported, &prefix);
            let expected = commits
                .iter()
                .filter(|oid| oid.starts_with(&prefix))
                .count();
            assert_eq!(candidates.len(), expected);
        }
        other => panic!("expected an ambiguous reference, got {other:?}"),
    }
    assert_eq!(repository.head().0, head_before);
    assert_eq!(repository.read("counter.txt"), "15\n");
}

#[rstest]
fn blobs_sharing_a_prefix_do_not_make_it_ambiguous(mut repository: TestRepository) {
    let (initial, _) = repository.head();
    let target = repository.commit_files(&[("a.txt", "target\n")], "target");
    repository.commit_files(&[("a.txt", "later\n")], "later");
    let (later, _) = repository.head();

    // shortest prefix naming `target` alone among the commits
    let prefix = (1..=40)
        .map(|len| target.as_ref()[..len].to_string())
        .find(|prefix| {
            [&initial, &later]
                .iter()
                .all(|other: &&ObjectId| !other.starts_with(prefix))
        })
        .unwrap();
    (0..)
        .map(|i| {
            repository
                .repository
                .database()
                .store(&Blob::from(format!("filler {i}").as_str()))
                .unwrap()
        })
        .find(|oid| oid.starts_with(&prefix))
        .unwrap();

    let reset_to = repository.repository.reset(&prefix).unwrap();

    assert_eq!(reset_to, target);
    assert_eq!(repository.read("a.txt"), "target\n");
}
