mod common;

use common::{fixture, run, stderr, stdout};

// ============================================================================
// generate
// ============================================================================

#[test]
fn generate_bash_from_fixture() {
    let output = run(&["generate", "bash", "--spec", &fixture("git.yaml"), "--quiet"]);
    assert!(output.status.success(), "generate failed: {}", stderr(&output));

    let script = stdout(&output);
    assert!(script.starts_with("#!/usr/bin/env bash\n# Command completion for git\n"));
    assert!(script.contains("_git_remote_add() {"));
    assert!(script.contains("__git_checkout_complete_branch() {"));
    assert!(script.trim_end().ends_with("complete -F _git git"));
}

#[test]
fn generate_zsh_wraps_bash() {
    let output = run(&["generate", "zsh", "-s", &fixture("git.yaml"), "-q"]);
    assert!(output.status.success(), "generate failed: {}", stderr(&output));

    let script = stdout(&output);
    assert!(script.contains("\nautoload bashcompinit\nbashcompinit\n"));
    assert!(!script.lines().any(|line| line == "compinit"));
    assert!(script.contains("__git_checkout_complete_branch() {"));
    assert!(script.contains("complete -F _git git"));
}

#[test]
fn generate_fish_from_fixture() {
    let output = run(&["generate", "fish", "-s", &fixture("git.yaml"), "-q"]);
    assert!(output.status.success(), "generate failed: {}", stderr(&output));

    let script = stdout(&output);
    assert!(script.contains("set -l git_subcommands status checkout add remote\n"));
    assert!(script.contains("set -l git_remote_subcommands add remove\n"));
    assert!(script.contains(
        "complete -f -c git -n \"not __fish_seen_subcommand_from $git_subcommands\" -s C --require-parameter -a \"(__fish_complete_path)\""
    ));
}

#[test]
fn generate_is_deterministic() {
    let first = run(&["generate", "bash", "-s", &fixture("git.yaml"), "-q"]);
    let second = run(&["generate", "bash", "-s", &fixture("git.yaml"), "-q"]);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn generate_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("git.bash");
    let output = run(&[
        "generate",
        "bash",
        "-s",
        &fixture("git.yaml"),
        "-o",
        &target.display().to_string(),
        "-q",
    ]);
    assert!(output.status.success(), "generate failed: {}", stderr(&output));
    assert!(output.stdout.is_empty(), "script should not go to stdout");

    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.trim_end().ends_with("complete -F _git git"));
}

#[test]
fn generate_output_directory_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&[
        "generate",
        "bash",
        "-s",
        &fixture("git.yaml"),
        "-o",
        &dir.path().display().to_string(),
        "-q",
    ]);
    assert_eq!(output.status.code(), Some(64));
    assert!(stderr(&output).contains("is a directory"));
}

#[test]
fn generate_empty_tree_prints_nothing() {
    for shell in ["bash", "zsh", "fish"] {
        let output = run(&["generate", shell, "-s", &fixture("noop.yaml"), "-q"]);
        assert!(output.status.success(), "{shell}: {}", stderr(&output));
        assert!(output.stdout.is_empty(), "{shell} should emit nothing");
    }
}

#[test]
fn generate_missing_file_is_io_error() {
    let output = run(&["generate", "bash", "-s", "/tmp/nonexistent_tabforge_spec.yaml"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("file not found"));
}

#[test]
fn generate_invalid_spec_lists_issues() {
    let output = run(&["generate", "bash", "-s", &fixture("invalid.yaml"), "-q"]);
    assert_eq!(output.status.code(), Some(2));

    let err = stderr(&output);
    assert!(err.contains("validation failed"), "stderr: {err}");
    assert!(err.contains("options[0].names[0]"), "stderr: {err}");
    assert!(err.contains("subcommands[1].name"), "stderr: {err}");
}

#[test]
fn generate_malformed_yaml_is_config_error() {
    let output = run(&["generate", "fish", "-s", &fixture("malformed.yaml"), "-q"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("parse error"));
}

#[test]
fn generate_strict_rejects_warnings() {
    let lenient = run(&["generate", "bash", "-s", &fixture("warnings.yaml"), "-q"]);
    assert!(lenient.status.success(), "lenient: {}", stderr(&lenient));

    let strict = run(&["generate", "bash", "-s", &fixture("warnings.yaml"), "--strict", "-q"]);
    assert_eq!(strict.status.code(), Some(2));
}

#[test]
fn generate_hidden_option_not_emitted() {
    let output = run(&["generate", "bash", "-s", &fixture("warnings.yaml"), "-q"]);
    let script = stdout(&output);
    assert!(script.contains("--flag"));
    assert!(!script.contains("--secret"));
    assert!(!script.contains("hunter2"));
}

#[test]
fn generate_substitutes_environment() {
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_tabforge"))
        .args(["generate", "fish", "-s", &fixture("env.yaml"), "-q"])
        .env("TABFORGE_TEST_TOOL", "mytool")
        .output()
        .unwrap();
    assert!(output.status.success(), "generate failed: {}", stderr(&output));
    assert!(stdout(&output).contains("complete -f -c mytool -l mode --require-parameter -a \"fast slow\""));

    let fallback = run(&["generate", "fish", "-s", &fixture("env.yaml"), "-q"]);
    assert!(stdout(&fallback).contains("complete -f -c envtool -l mode"));
}

#[test]
fn generate_unknown_shell_is_usage_error() {
    let output = run(&["generate", "tcsh", "-s", &fixture("git.yaml")]);
    assert_eq!(output.status.code(), Some(2), "clap reports usage errors with 2");
}

// ============================================================================
// validate
// ============================================================================

#[test]
fn validate_valid_spec() {
    let output = run(&["validate", &fixture("git.yaml"), "-q"]);
    assert!(output.status.success(), "validate failed: {}", stderr(&output));
    assert!(stdout(&output).contains("git.yaml: ok"));
}

#[test]
fn validate_reports_every_file() {
    let output = run(&["validate", &fixture("git.yaml"), &fixture("invalid.yaml"), "-q"]);
    assert_eq!(output.status.code(), Some(2));

    let report = stdout(&output);
    assert!(report.contains("git.yaml: ok"));
    assert!(report.contains("invalid.yaml: FAILED"));
    assert!(report.contains("  error: "));
    assert!(report.contains("1 of 2 file(s) failed validation"));
}

#[test]
fn validate_json_output() {
    let output = run(&[
        "validate",
        "--format",
        "json",
        &fixture("warnings.yaml"),
        &fixture("invalid.yaml"),
        "-q",
    ]);
    assert_eq!(output.status.code(), Some(2));

    let parsed: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("output should be valid JSON");
    let files = parsed.as_array().expect("JSON report should be an array");
    assert_eq!(files.len(), 2);

    assert_eq!(files[0]["valid"], true);
    assert_eq!(files[0]["warnings"].as_array().unwrap().len(), 2);
    assert_eq!(files[1]["valid"], false);
    assert!(files[1]["errors"].as_array().unwrap().len() >= 4);
}

#[test]
fn validate_missing_file() {
    let output = run(&["validate", "/tmp/nonexistent_tabforge_test_file.yaml", "-q"]);
    assert!(!output.status.success(), "validate should fail for nonexistent file");
    assert!(stdout(&output).contains("FAILED"));
}

#[test]
fn validate_strict_promotes_warnings() {
    let output = run(&["validate", "--strict", &fixture("warnings.yaml"), "-q"]);
    assert_eq!(output.status.code(), Some(2));
}

// ============================================================================
// completions / version
// ============================================================================

#[test]
fn completions_for_each_shell() {
    for shell in ["bash", "zsh", "fish"] {
        let output = run(&["completions", shell, "-q"]);
        assert!(output.status.success(), "{shell}: {}", stderr(&output));
        assert!(stdout(&output).contains("# Command completion for tabforge"));
    }
}

#[test]
fn version_json() {
    let output = run(&["version", "--format", "json", "-q"]);
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["name"], "tabforge");
    assert_eq!(parsed["version"], env!("CARGO_PKG_VERSION"));
}
