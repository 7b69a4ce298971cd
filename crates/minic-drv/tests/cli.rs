//! End-to-end tests driving the `minic` binary as a subprocess.

use assert_cmd::Command;
use predicates::prelude::*;

fn minic() -> Command {
    Command::cargo_bin("minic").expect("minic binary should build")
}

#[test]
fn help_lists_the_fixture_argument() {
    minic()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fixture"));
}

#[test]
fn version_reports_the_crate_version() {
    minic()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_fixture_is_rejected_before_compiling() {
    minic().arg("not-a-real-fixture").assert().failure();
}

#[test]
fn add_zero_compiles_to_assembly_on_stdout() {
    minic()
        .arg("add-zero")
        .assert()
        .success()
        .stdout(predicate::str::contains("main:").and(predicate::str::contains("$3")));
}

#[test]
fn constant_fold_emits_the_folded_literal_directly_to_memory() {
    minic()
        .arg("constant-fold")
        .assert()
        .success()
        .stdout(predicate::str::contains("$21"));
}

#[test]
fn if_else_emits_both_branch_labels() {
    minic()
        .arg("if-else")
        .assert()
        .success()
        .stdout(predicate::str::contains("je").or(predicate::str::contains("jne")));
}

#[test]
fn while_loop_emits_a_backward_jump() {
    minic().arg("while-loop").assert().success().stdout(predicate::str::contains("jmp"));
}

#[test]
fn bxor_negate_is_rewritten_to_a_bitwise_complement() {
    minic().arg("bxor-negate").assert().success().stdout(predicate::str::contains("notl"));
}

#[test]
fn short_circuit_compiles_successfully() {
    minic().arg("short-circuit").assert().success();
}

#[test]
fn use_before_init_fails_with_a_nonzero_exit_and_no_assembly() {
    minic()
        .arg("use-before-init")
        .assert()
        .failure()
        .stdout(predicate::str::contains("main:").not());
}

#[test]
fn undeclared_id_reports_a_diagnostic_on_stderr() {
    minic()
        .arg("undeclared-id")
        .assert()
        .failure()
        .stderr(predicate::str::is_empty().not());
}

#[test]
fn output_flag_writes_assembly_to_a_file_instead_of_stdout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("add_zero.s");

    minic()
        .arg("add-zero")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let contents = std::fs::read_to_string(&out).expect("output file should exist");
    assert!(contents.contains("main:"));
}
