use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn evaluates_argument() {
    let mut cmd = cargo_bin_cmd!("calc");
    cmd.arg("2 * 3 + 4 * 5");
    cmd.assert().success().stdout("22\n");
}

#[test]
fn evaluates_each_argument() {
    let mut cmd = cargo_bin_cmd!("calc");
    cmd.arg("1 + 1").arg("(1 + 2) * 3");
    cmd.assert().success().stdout("2\n9\n");
}

#[test]
fn reads_lines_from_stdin() {
    let mut cmd = cargo_bin_cmd!("calc");
    cmd.write_stdin("1 + 2 + 3\n\n7 / 2\n");
    cmd.assert().success().stdout("6\n3\n");
}

#[test]
fn right_recursive_grammar_groups_right() {
    let mut cmd = cargo_bin_cmd!("calc");
    cmd.arg("--grammar").arg("right").arg("--tree").arg("8 - 4 - 2");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(8 - (4 - 2)) = 6"));
}

#[test]
fn tree_output() {
    let mut cmd = cargo_bin_cmd!("calc");
    cmd.arg("--tree").arg("1 + 2 * 3");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(1 + (2 * 3)) = 7"));
}

#[test]
fn compact_grammar_rejects_blanks_with_all() {
    let mut cmd = cargo_bin_cmd!("calc");
    cmd.arg("--grammar").arg("compact").arg("--all").arg("1 + 2");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unexpected trailing input at 1"));
}

#[test]
fn trailing_input_is_ignored_without_all() {
    let mut cmd = cargo_bin_cmd!("calc");
    cmd.arg("--grammar").arg("compact").arg("1+2 ignored");
    cmd.assert().success().stdout("3\n");
}

#[test]
fn division_by_zero_fails() {
    let mut cmd = cargo_bin_cmd!("calc");
    cmd.arg("1 / 0");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("division by zero"));
}

#[test]
fn no_memo_gives_same_answer() {
    let mut cmd = cargo_bin_cmd!("calc");
    cmd.arg("--no-memo").arg("--grammar").arg("right").arg("2 * 3 + 4 * 5");
    cmd.assert().success().stdout("22\n");
}

#[test]
fn recursion_limit_is_enforced() {
    let mut cmd = cargo_bin_cmd!("calc");
    cmd.arg("--recursion-limit").arg("8").arg("((1))");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("recursion limit of 8 exceeded"));

    let mut cmd = cargo_bin_cmd!("calc");
    cmd.arg("((1))");
    cmd.assert().success().stdout("1\n");
}

#[test]
fn parse_error_reports_position() {
    let mut cmd = cargo_bin_cmd!("calc");
    cmd.arg("+ 1");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("parse error at 0"));
}

#[test]
fn parse_error_marks_column() {
    let mut cmd = cargo_bin_cmd!("calc");
    cmd.arg("(1 + é");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("parse error at 5"))
        .stderr(predicate::str::contains("  (1 + é\n       ^\n"));
}
