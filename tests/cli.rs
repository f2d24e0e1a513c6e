//! CLI integration tests for tinyawk
//!
//! These tests run the tinyawk binary and verify command-line behavior.

use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::NamedTempFile;

/// Run tinyawk with the given arguments and input, returning stdout on
/// success and stderr on failure
fn run_tinyawk(args: &[&str], input: Option<&str>) -> Result<String, String> {
    let mut cmd = Command::new("cargo");
    cmd.args(["run", "--quiet", "--"]);
    cmd.args(args);

    cmd.stdin(if input.is_some() { Stdio::piped() } else { Stdio::null() });
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| e.to_string())?;

    if let Some(input_str) = input
        && let Some(mut stdin) = child.stdin.take()
    {
        stdin.write_all(input_str.as_bytes()).map_err(|e| e.to_string())?;
    }

    let output = child.wait_with_output().map_err(|e| e.to_string())?;

    if output.status.success() {
        String::from_utf8(output.stdout).map_err(|e| e.to_string())
    } else {
        assert_eq!(output.status.code(), Some(2), "failures exit with status 2");
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_cli_help() {
    let output = run_tinyawk(&["--help"], None).unwrap();
    assert!(output.contains("Usage:"));
    assert!(output.contains("tinyawk"));
}

#[test]
fn test_cli_version() {
    let output = run_tinyawk(&["--version"], None).unwrap();
    assert!(output.contains("tinyawk"));
}

#[test]
fn test_cli_simple_program() {
    let output = run_tinyawk(&["BEGIN { print \"hello\" }"], None).unwrap();
    assert_eq!(output, "hello\n");
}

#[test]
fn test_cli_with_input() {
    let output = run_tinyawk(&["{ print $1 }"], Some("a b c")).unwrap();
    assert_eq!(output, "a\n");
}

#[test]
fn test_cli_dash_reads_stdin() {
    let output = run_tinyawk(&["{ print NR }", "-"], Some("x\ny\n")).unwrap();
    assert_eq!(output, "1\n2\n");
}

#[test]
fn test_cli_field_separator() {
    let output = run_tinyawk(&["-F", ":", "{ print $1 }"], Some("a:b:c")).unwrap();
    assert_eq!(output, "a\n");
}

#[test]
fn test_cli_field_separator_attached() {
    let output = run_tinyawk(&["-F,", "{ print $2 }"], Some("a,b,c")).unwrap();
    assert_eq!(output, "b\n");
}

#[test]
fn test_cli_variable() {
    let output = run_tinyawk(&["-v", "x=5", "BEGIN { print x + 1 }"], None).unwrap();
    assert_eq!(output, "6\n");
}

#[test]
fn test_cli_multiple_variables() {
    let output = run_tinyawk(&["-v", "a=1", "--assign", "b=two", "BEGIN { print a, b }"], None).unwrap();
    assert_eq!(output, "1 two\n");
}

#[test]
fn test_cli_bad_variable() {
    let err = run_tinyawk(&["-v", "1x=5", "BEGIN { print 1 }"], None).unwrap_err();
    assert!(err.contains("invalid variable name"));
}

#[test]
fn test_cli_program_file() {
    let program = temp_file("BEGIN { FS = \",\" }\n{ print $2 }\n");
    let output = run_tinyawk(&["-f", program.path().to_str().unwrap()], Some("a,b,c\nd,e,f\n")).unwrap();
    assert_eq!(output, "b\ne\n");
}

#[test]
fn test_cli_input_file() {
    let input = temp_file("1\n2\n3\n");
    let output = run_tinyawk(&["{ sum += $1 } END { print sum }", input.path().to_str().unwrap()], None).unwrap();
    assert_eq!(output, "6\n");
}

#[test]
fn test_cli_missing_input_file() {
    let err = run_tinyawk(&["{ print $0 }", "/nonexistent/input.txt"], None).unwrap_err();
    assert!(err.contains("failed to read input file"));
}

#[test]
fn test_cli_missing_program() {
    let err = run_tinyawk(&[], None).unwrap_err();
    assert!(err.contains("no program provided"));
}

#[test]
fn test_cli_empty_program() {
    let err = run_tinyawk(&["   "], None).unwrap_err();
    assert!(err.contains("program is empty"));
}

#[test]
fn test_cli_syntax_error() {
    let err = run_tinyawk(&["BEGIN { print 1"], None).unwrap_err();
    assert!(err.contains("invalid program"));
    assert!(err.contains("syntax error"));
}

#[test]
fn test_cli_runtime_error_keeps_output() {
    let mut cmd = Command::new("cargo");
    cmd.args(["run", "--quiet", "--", "{ print $1; print $1 / 0 }"]);
    cmd.stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped());

    let mut child = cmd.spawn().unwrap();
    child.stdin.take().unwrap().write_all(b"4\n").unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "4\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("division by zero"));
}

#[test]
fn test_cli_script_size_limit() {
    let err = run_tinyawk(&["--max-script-bytes", "10", "BEGIN { print \"too long\" }"], None).unwrap_err();
    assert!(err.contains("limit is 10"));
}

#[test]
fn test_cli_input_size_limit() {
    let err = run_tinyawk(&["--max-input-bytes", "4", "{ print $0 }"], Some("more than four")).unwrap_err();
    assert!(err.contains("input is 14 bytes"));

    let output = run_tinyawk(&["--max-input-bytes", "4", "{ print $1 }"], Some("abc")).unwrap();
    assert_eq!(output, "abc\n");
}
