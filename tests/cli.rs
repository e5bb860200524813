//! Command line behaviour.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn ppl() -> Command {
    let mut cmd = Command::cargo_bin("ppl-grammar").unwrap();
    cmd.env_remove("PPL_GRAMMAR_CONFIG");
    cmd
}

fn source_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_info() {
    ppl()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("PCBoard Programming Language (ppl)"));
}

#[test]
fn test_info_json() {
    ppl()
        .args(["info", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"ppl\""));
}

#[test]
fn test_parse_prints_tree() {
    let file = source_file("PRINTLN \"Hello\"\n");
    ppl()
        .arg("parse")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("source_file [0, 0] - [1, 0]"))
        .stdout(predicate::str::contains("name: builtin_statement"));
}

#[test]
fn test_parse_json() {
    let file = source_file("BREAK\n");
    ppl()
        .args(["--json", "parse"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"break_statement\""));
}

#[test]
fn test_parse_error_exits_nonzero() {
    let file = source_file("IF (a) THEN\n  PRINTLN a\n");
    ppl()
        .arg("parse")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Parse error at 3:1"));
}

#[test]
fn test_check_reports_each_file() {
    let good = source_file("CLS\n");
    let bad = source_file("WHILE (x) DO\n");
    ppl()
        .arg("check")
        .arg(good.path())
        .arg(bad.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("ok    "))
        .stdout(predicate::str::contains("FAIL  "))
        .stdout(predicate::str::contains("2 file(s) checked, 1 failed"));
}

#[test]
fn test_check_all_good() {
    let good = source_file("INTEGER a\na = 1\n");
    ppl()
        .arg("check")
        .arg(good.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 file(s) checked, 0 failed"));
}

#[test]
fn test_check_missing_file() {
    ppl()
        .args(["check", "/nonexistent/missing.pps"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("failed to read"));
}

#[test]
fn test_highlight() {
    let file = source_file("PRINTLN 42 ; done\n");
    ppl()
        .arg("highlight")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("function.builtin"))
        .stdout(predicate::str::contains("number"))
        .stdout(predicate::str::contains("comment"));
}

#[test]
fn test_config_file_sets_format_and_comments() {
    let config = source_file("[parser]\nkeep_comments = false\n\n[output]\nformat = \"json\"\n");
    let file = source_file("; note\nCLS\n");
    ppl()
        .arg("--config")
        .arg(config.path())
        .arg("parse")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"predefined_call\""))
        .stdout(predicate::str::contains("comment").not());
}

#[test]
fn test_config_from_environment() {
    let config = source_file("[output]\nformat = \"json\"\n");
    ppl()
        .env("PPL_GRAMMAR_CONFIG", config.path())
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_bad_config_is_reported() {
    let config = source_file("[output]\nformat = \"xml\"\n");
    ppl()
        .arg("--config")
        .arg(config.path())
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn test_no_comments_flag() {
    let file = source_file("CLS ; clear\n");
    ppl()
        .args(["parse", "--no-comments"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("comment").not());
}
