use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn write_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn wfa() -> Command {
    Command::cargo_bin("wfa").unwrap()
}

#[test]
fn word_frequency_csv_to_stdout() {
    let td = tempdir().unwrap();
    write_file(td.path(), "a.txt", "First Paper\nthe cat sat on the mat");
    write_file(td.path(), "b.txt", "Second Paper\nthe dog sat");

    wfa()
        .arg("word-frequency")
        .arg(td.path())
        .args(["--per-document", "--num-words", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Each block of document:"))
        .stdout(predicate::str::contains("Block #1/1 (within 'First Paper')"))
        .stdout(predicate::str::contains("For the entire dataset:"));
}

#[test]
fn word_frequency_json_to_file() {
    let td = tempdir().unwrap();
    let docs = td.path().join("docs");
    fs::create_dir(&docs).unwrap();
    write_file(&docs, "a.txt", "one two two three three three");
    let out = td.path().join("out.json");

    wfa()
        .arg("word-frequency")
        .arg(&docs)
        .arg("--json")
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["word_list"][0], "three");
    assert_eq!(json["num_dataset_tokens"], 6);
}

#[test]
fn config_file_is_read_and_flags_override_it() {
    let td = tempdir().unwrap();
    let docs = td.path().join("docs");
    fs::create_dir(&docs).unwrap();
    write_file(&docs, "a.txt", "alpha beta gamma delta epsilon zeta eta theta");
    let config = td.path().join("config.json");
    write_file(td.path(), "config.json", r#"{"block_size": 2, "last_block": "small_last"}"#);

    wfa()
        .arg("word-frequency")
        .arg(&docs)
        .arg("--config")
        .arg(&config)
        .args(["--block-size", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Block #3 of 3 words (within dataset 'docs')"))
        .stdout(predicate::str::contains("Block #4 of").not());
}

#[test]
fn stop_words_with_ngrams_fail() {
    let td = tempdir().unwrap();
    let docs = td.path().join("docs");
    fs::create_dir(&docs).unwrap();
    write_file(&docs, "a.txt", "some words here");
    write_file(td.path(), "stop.txt", "the a an");

    wfa()
        .arg("word-frequency")
        .arg(&docs)
        .args(["--ngrams", "2", "--stop-words"])
        .arg(td.path().join("stop.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn craig_zeta_json() {
    let td = tempdir().unwrap();
    let a = td.path().join("austen");
    let b = td.path().join("melville");
    fs::create_dir(&a).unwrap();
    fs::create_dir(&b).unwrap();
    write_file(&a, "p.txt", "a truth universally acknowledged that a single man");
    write_file(&b, "m.txt", "call me ishmael some years ago never mind how long");

    wfa()
        .arg("craig-zeta")
        .arg(&a)
        .arg("--compare")
        .arg(&b)
        .args(["--block-size", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name_1\": \"austen\""))
        .stdout(predicate::str::contains("\"label\": \"melville: 1\""));
}

#[test]
fn collocation_csv() {
    let td = tempdir().unwrap();
    write_file(td.path(), "a.txt", "new york is a big city and new york never sleeps");

    wfa()
        .arg("collocation")
        .arg(td.path())
        .args(["--test", "t", "--num-pairs", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Significance test: T-test"))
        .stdout(predicate::str::contains("new york,"));
}

#[test]
fn missing_directory_fails() {
    let td = tempdir().unwrap();
    wfa()
        .arg("word-frequency")
        .arg(td.path().join("does_not_exist"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
