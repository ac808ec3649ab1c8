//! End-to-end tests for the neardup binary.

use assert_cmd::Command;
use predicates::prelude::*;

const CORPUS: &str = "p1\thello world foo baz bar zomg\n\
                      p2\tgoodbye world foo qux bar zomg\n\
                      p3\tentirely unrelated\n";

fn write_corpus(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("corpus.tsv");
    std::fs::write(&path, CORPUS).unwrap();
    path
}

fn neardup() -> Command {
    Command::cargo_bin("neardup").unwrap()
}

#[test]
fn exact_query_prints_its_match_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = write_corpus(&dir);

    neardup()
        .arg("--rng-seed")
        .arg("42")
        .arg("--corpus")
        .arg(&corpus)
        .arg("hello world foo baz bar zomg")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id":"p1""#))
        .stdout(predicate::str::contains(r#""similarity":1.0"#));
}

#[test]
fn unrelated_query_prints_an_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = write_corpus(&dir);

    neardup()
        .arg("--rng-seed")
        .arg("42")
        .arg("--corpus")
        .arg(&corpus)
        .arg("totally different text with nothing shared")
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn snapshot_persists_the_corpus_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = write_corpus(&dir);
    let snapshot = dir.path().join("index.snapshot");

    neardup()
        .arg("--rng-seed")
        .arg("42")
        .arg("--corpus")
        .arg(&corpus)
        .arg("--snapshot")
        .arg(&snapshot)
        .arg("entirely unrelated")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id":"p3""#));

    // second run restores from the snapshot, no corpus needed
    neardup()
        .arg("--snapshot")
        .arg(&snapshot)
        .arg("entirely unrelated")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id":"p3""#));
}

#[test]
fn out_of_range_threshold_fails() {
    neardup()
        .arg("--threshold")
        .arg("1.5")
        .arg("whatever")
        .assert()
        .failure()
        .stderr(predicate::str::contains("threshold"));
}

#[test]
fn zero_bands_fails() {
    neardup()
        .arg("--bands")
        .arg("0")
        .arg("whatever")
        .assert()
        .failure()
        .stderr(predicate::str::contains("bands"));
}

#[test]
fn malformed_corpus_line_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corpus.tsv");
    std::fs::write(&path, "p1 no tab separator\n").unwrap();

    neardup()
        .arg("--corpus")
        .arg(&path)
        .arg("whatever")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 1"));
}
