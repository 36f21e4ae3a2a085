//! CLI tests for `docfence validate` and `docfence languages`.
//!
//! Spawns the binary and checks exit codes and report output for clean,
//! invalid, and unreadable tutorial directories.

use std::fs;
use std::process::Command;

use docfence::exit_codes;
use docfence::test_support::{BROKEN_TUTORIAL, TutorialDir};

fn docfence() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_docfence"));
    command.env_remove("RUST_LOG");
    command
}

#[test]
fn validate_without_strict_exits_ok() {
    let dir = TutorialDir::with_samples().expect("samples");
    let output = docfence()
        .arg("validate")
        .arg(dir.path())
        .output()
        .expect("docfence validate");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("variables.js: 3 snippets (valid=1 invalid=1 unchecked=1)"));
    assert!(stdout.contains("  invalid #1 javascript (line 15):"));
    assert!(stdout.contains(
        "summary: files=2 failed=0 snippets=6 valid=3 invalid=1 unchecked=2 warnings=0"
    ));
}

#[test]
fn validate_strict_exits_with_invalid_code() {
    let dir = TutorialDir::with_samples().expect("samples");
    let status = docfence()
        .arg("validate")
        .arg(dir.path())
        .arg("--strict")
        .status()
        .expect("docfence validate --strict");

    assert_eq!(status.code(), Some(exit_codes::INVALID_SNIPPETS));
}

#[test]
fn corrupt_file_exits_with_load_failed_even_in_strict_mode() {
    let dir = TutorialDir::with_samples().expect("samples");
    fs::write(dir.path().join("corrupt.md"), [0xc3, 0x28, 0xa0]).expect("write");

    let output = docfence()
        .arg("validate")
        .arg(dir.path())
        .arg("--strict")
        .output()
        .expect("docfence validate");

    assert_eq!(output.status.code(), Some(exit_codes::LOAD_FAILED));
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("failed: corrupt.md:"));
    assert!(stdout.contains("variables.js: 3 snippets"));
}

#[test]
fn missing_input_dir_exits_with_load_failed() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = docfence()
        .arg("validate")
        .arg(temp.path().join("missing"))
        .output()
        .expect("docfence validate");

    assert_eq!(output.status.code(), Some(exit_codes::LOAD_FAILED));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("does not exist"));
}

#[test]
fn unterminated_fence_is_reported_as_warning() {
    let dir = TutorialDir::new(&[("loops.md", BROKEN_TUTORIAL)]).expect("dir");
    let output = docfence()
        .arg("validate")
        .arg(dir.path())
        .arg("--json")
        .output()
        .expect("docfence validate --json");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["files"][0]["snippets"].as_array().map(Vec::len), Some(0));
    assert_eq!(report["files"][0]["warnings"].as_array().map(Vec::len), Some(1));
    assert_eq!(report["summary"]["warnings"], 1);
}

#[test]
fn deeply_nested_snippet_is_invalid_and_batch_survives() {
    let dir = TutorialDir::with_samples().expect("samples");
    let deep = format!(
        "```js\nlet x = {}1{};\n```\n",
        "(".repeat(20_000),
        ")".repeat(20_000)
    );
    let nested = format!(
        "```js\nlet y = {}1{};\n```\n",
        "[".repeat(120),
        "]".repeat(120)
    );
    fs::write(dir.path().join("deep.md"), deep).expect("write deep");
    fs::write(dir.path().join("nested.md"), nested).expect("write nested");

    let output = docfence()
        .arg("validate")
        .arg(dir.path())
        .arg("--json")
        .output()
        .expect("docfence validate");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    let files = report["files"].as_array().expect("files");
    let file = |path: &str| {
        files
            .iter()
            .find(|file| file["path"] == path)
            .unwrap_or_else(|| panic!("{path} missing from report"))
    };
    assert_eq!(file("deep.md")["snippets"][0]["validity"], "invalid");
    assert_eq!(
        file("deep.md")["snippets"][0]["message"],
        "nesting exceeds 128 levels"
    );
    assert_eq!(file("nested.md")["snippets"][0]["validity"], "valid");
    assert_eq!(file("variables.js")["snippets"].as_array().map(Vec::len), Some(3));
    assert_eq!(report["summary"]["files"], 4);
}

#[test]
fn config_alias_brings_tag_into_scope() {
    let dir = TutorialDir::new(&[
        ("docfence.toml", "[languages.aliases]\nes6 = \"javascript\"\n"),
        ("arrows.md", "```es6\nconst f = (x) => ;\n```\n"),
    ])
    .expect("dir");

    let status = docfence()
        .arg("validate")
        .arg(dir.path())
        .arg("--strict")
        .status()
        .expect("docfence validate");
    assert_eq!(status.code(), Some(exit_codes::INVALID_SNIPPETS));
}

#[test]
fn languages_lists_builtin_tags() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = docfence()
        .current_dir(temp.path())
        .arg("languages")
        .output()
        .expect("docfence languages");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.lines().any(|line| line == "js -> javascript"));
    assert!(stdout.lines().any(|line| line == "json -> json"));
    assert!(stdout.lines().any(|line| line == "toml -> toml"));
}
