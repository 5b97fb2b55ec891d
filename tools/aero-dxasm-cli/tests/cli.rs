use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const LISTING: &str = "\
ps_4_0
   0: dcl_input_ps linear v1.xy
   1: mul r0.w, r0.w, v5.w
   2: mov r1.xz, v1.xyzw
   3: ret
";

#[test]
fn translates_file_to_stdout() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("shader.asm");
    fs::write(&input, LISTING).unwrap();

    Command::cargo_bin("aero-dxasm")
        .unwrap()
        .arg(&input)
        .assert()
        .success()
        .stdout("float r0.w = r0.w * v5.w;\nfloat2 r1.xz = v1.xz;\n")
        .stderr(predicate::str::contains(
            "line 2: no implementation for `dcl_input_ps`",
        ))
        .stderr(predicate::str::contains("line 5: no implementation for `ret`"));
}

#[test]
fn strict_fails_on_diagnostics() {
    Command::cargo_bin("aero-dxasm")
        .unwrap()
        .args(["-", "--strict", "--quiet"])
        .write_stdin(LISTING)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("float r0.w = r0.w * v5.w;"))
        .stderr(predicate::str::contains("no implementation").not());
}

#[test]
fn writes_output_file_with_options() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("shader.asm");
    let output = dir.path().join("shader.hlsl");
    fs::write(&input, "0: add r0.xy, r1.xyzw, r2.xyzw\n").unwrap();

    Command::cargo_bin("aero-dxasm")
        .unwrap()
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--scalar", "half", "--strict"])
        .assert()
        .success()
        .stdout("");

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "half2 r0.xy = r1.xy + r2.xy;\n"
    );

    Command::cargo_bin("aero-dxasm")
        .unwrap()
        .arg(&input)
        .arg("--no-declare")
        .assert()
        .success()
        .stdout("r0.xy = r1.xy + r2.xy;\n");
}

#[test]
fn missing_input_is_an_error() {
    Command::cargo_bin("aero-dxasm")
        .unwrap()
        .arg("/nonexistent/shader.asm")
        .assert()
        .failure()
        .stderr(predicate::str::contains("read /nonexistent/shader.asm"));
}

#[test]
fn rejects_unknown_scalar_type() {
    Command::cargo_bin("aero-dxasm")
        .unwrap()
        .args(["-", "--scalar", "double"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown scalar type"));
}
