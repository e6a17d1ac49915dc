use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

#[allow(deprecated)]
fn code_canvas(workdir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("code-canvas").expect("binary");
    cmd.current_dir(workdir).arg("--quiet");
    cmd
}

fn run_json(workdir: &std::path::Path, args: &[&str]) -> Value {
    let output = code_canvas(workdir).args(args).output().expect("command run");

    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    serde_json::from_slice(&output.stdout).expect("valid json")
}

fn setup_project() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(
        root.join("src/util.js"),
        "export function add(a,b){return a+b}\n",
    )
    .unwrap();
    fs::write(
        root.join("src/main.js"),
        "import './util';\nfunction run() {\n  return add(1, 2);\n}\nadd(3, 4);\n",
    )
    .unwrap();
    fs::write(root.join("src/readme.md"), "# not code\n").unwrap();
    temp
}

#[test]
fn analyze_prints_structures_and_import_edges() {
    let temp = setup_project();
    let body = run_json(temp.path(), &["analyze", "src"]);

    let structures = body["structures"].as_object().expect("structures map");
    let paths: Vec<&str> = structures.keys().map(String::as_str).collect();
    assert_eq!(paths, vec!["main.js", "util.js"]);

    assert_eq!(body["structures"]["util.js"]["symbols"][0]["name"], "add");
    assert_eq!(body["structures"]["main.js"]["imports"][0], "./util");

    let edges = body["edges"].as_array().expect("edges");
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0]["source"], "main.js");
    assert_eq!(edges[0]["target"], "util.js");
    assert_eq!(edges[0]["kind"], "imports");

    let nodes = body["nodes"].as_array().expect("nodes");
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|n| n["position"]["x"].is_number()));
    assert!(body["skipped"].as_array().unwrap().is_empty());
}

#[test]
fn usages_groups_callers() {
    let temp = setup_project();
    let body = run_json(temp.path(), &["usages", "src", "--symbol", "add"]);

    assert_eq!(body["subject"]["file"], "util.js");
    assert_eq!(body["subject"]["kind"], "function");

    let groups = body["groups"].as_array().expect("groups");
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["context"]["scope"], "function");
    assert_eq!(groups[0]["context"]["name"], "run");
    assert_eq!(groups[1]["context"]["scope"], "file");

    let calls: Vec<&Value> = body["edges"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["kind"] == "calls")
        .collect();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|e| e["target"] == "util.js"));
    assert_eq!(body["nodes"].as_array().unwrap().len(), 3);
}

#[test]
fn usages_of_unknown_symbol_fails() {
    let temp = setup_project();
    code_canvas(temp.path())
        .args(["usages", "src", "--symbol", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Symbol 'missing' not found"));
}

#[test]
fn usages_restricted_to_file() {
    let temp = setup_project();
    code_canvas(temp.path())
        .args(["usages", "src", "--symbol", "add", "--file", "src/main.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in main.js"));
}

#[test]
fn usages_of_arrow_function_resolve_the_function() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/util.js"), "export const add = (a, b) => a + b;\n").unwrap();
    fs::write(root.join("src/main.js"), "import { add } from './util';\nadd(1, 2);\n").unwrap();

    let body = run_json(root, &["usages", "src", "--symbol", "add"]);
    assert_eq!(body["subject"]["kind"], "function");
    assert_eq!(body["subject"]["file"], "util.js");

    let groups = body["groups"].as_array().expect("groups");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["file"], "main.js");
    assert_eq!(groups[0]["context"]["scope"], "file");
}

#[test]
fn directory_name_does_not_take_part_in_import_matching() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("react-app/src")).unwrap();
    fs::write(
        root.join("react-app/src/a.js"),
        "import React from 'react';\n",
    )
    .unwrap();
    fs::write(root.join("react-app/src/b.js"), "export const b = 1;\n").unwrap();

    let body = run_json(root, &["analyze", "react-app"]);
    let paths: Vec<&str> = body["structures"]
        .as_object()
        .expect("structures map")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(paths, vec!["src/a.js", "src/b.js"]);
    assert!(body["edges"].as_array().expect("edges").is_empty());
}

#[test]
fn file_restriction_accepts_the_path_as_typed() {
    let temp = setup_project();
    let body = run_json(
        temp.path(),
        &["usages", "src", "--symbol", "add", "--file", "src/util.js"],
    );
    assert_eq!(body["subject"]["file"], "util.js");
}

#[test]
fn grammarless_files_are_reported_as_skipped() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::write(root.join("main.go"), "package main\n").unwrap();
    fs::write(root.join("app.py"), "def app():\n    pass\n").unwrap();

    let body = run_json(root, &["analyze", "main.go", "app.py"]);
    assert_eq!(body["skipped"][0]["path"], "main.go");
    assert!(body["structures"]["app.py"].is_object());
}

#[test]
fn config_file_changes_fallback_language() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::write(
        root.join("canvas.toml"),
        "[analyzer]\nfallback_language = \"python\"\n",
    )
    .unwrap();
    fs::write(root.join("script"), "def main():\n    pass\n").unwrap();

    let body = run_json(root, &["analyze", "script", "--config", "canvas.toml"]);
    assert_eq!(body["structures"]["script"]["language"], "python");
    assert_eq!(body["structures"]["script"]["symbols"][0]["name"], "main");
}

#[test]
fn invalid_config_is_rejected() {
    let temp = setup_project();
    fs::write(temp.path().join("bad.toml"), "[layout]\nrow_pitch = 0.0\n").unwrap();
    code_canvas(temp.path())
        .args(["analyze", "src", "--config", "bad.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn pretty_output_is_indented() {
    let temp = setup_project();
    code_canvas(temp.path())
        .args(["analyze", "src/util.js", "--pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  \"structures\""));
}
