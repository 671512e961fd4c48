use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[allow(deprecated)]
fn analyst(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("analyst").expect("binary");
    cmd.current_dir(workdir)
        .env("ANALYST_EMBEDDING_MODE", "stub")
        .env_remove("GEMINI_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn run_json(workdir: &Path, args: &[&str]) -> Value {
    let output = analyst(workdir).args(args).output().expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

fn setup_project() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(
        root.join("src/config.ts"),
        "export function loadConfig(path: string) {\n  return parseSettings(readFile(path));\n}\n",
    )
    .unwrap();
    fs::write(
        root.join("src/panel.tsx"),
        "export const Panel = () => <div className=\"panel\">{renderTheme()}</div>;\n",
    )
    .unwrap();
    fs::write(root.join("README.md"), "not indexed").unwrap();
    temp
}

#[test]
fn index_then_query_returns_relevant_chunk() {
    let temp = setup_project();
    let root = temp.path();

    let report = run_json(root, &["index", ".", "--json"]);
    assert_eq!(report["files"], 2);
    assert_eq!(report["chunks"], 2);
    assert_eq!(report["reused_snapshot"], false);
    assert!(root.join(".analyst-cache/embeddings.json").is_file());

    let output = run_json(
        root,
        &["query", "loadConfig parseSettings readFile", "-k", "1", "--json"],
    );
    let results = output["results"].as_array().expect("results");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["source_path"], "src/config.ts");
    assert_eq!(output["top_k"], 1);
}

#[test]
fn query_prints_annotated_context() {
    let temp = setup_project();
    let root = temp.path();
    analyst(root).args(["index", "."]).assert().success();

    analyst(root)
        .args(["query", "loadConfig", "-k", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("// src/config.ts\nexport function loadConfig"))
        .stdout(predicate::str::contains("\n---\n"));
}

#[test]
fn query_without_index_returns_no_results() {
    let temp = setup_project();
    let output = run_json(temp.path(), &["query", "anything", "--json"]);
    assert_eq!(output["results"].as_array().map(Vec::len), Some(0));
    assert_eq!(output["top_k"], 6);
}

#[test]
fn second_index_reuses_snapshot_unless_forced() {
    let temp = setup_project();
    let root = temp.path();
    run_json(root, &["index", ".", "--json"]);

    fs::write(root.join("src/extra.js"), "module.exports = 42;\n").unwrap();

    let reused = run_json(root, &["index", ".", "--json"]);
    assert_eq!(reused["reused_snapshot"], true);
    assert_eq!(reused["chunks"], 2);

    let rebuilt = run_json(root, &["index", ".", "--force", "--json"]);
    assert_eq!(rebuilt["reused_snapshot"], false);
    assert_eq!(rebuilt["chunks"], 3);
}

#[test]
fn status_reports_snapshot_contents() {
    let temp = setup_project();
    let root = temp.path();

    let before = run_json(root, &["status", ".", "--json"]);
    assert_eq!(before["exists"], false);
    assert_eq!(before["chunks"], 0);

    run_json(root, &["index", ".", "--json"]);
    let after = run_json(root, &["status", ".", "--json"]);
    assert_eq!(after["exists"], true);
    assert_eq!(after["chunks"], 2);
    assert_eq!(after["files"], 2);
    assert_eq!(after["dimension"], 64);
    assert!(after["age_secs"].as_u64().is_some());
}

#[test]
fn gemini_mode_requires_api_key() {
    let temp = setup_project();
    analyst(temp.path())
        .env_remove("ANALYST_EMBEDDING_MODE")
        .args(["--embed-mode", "gemini", "index", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key"));
}

#[test]
fn chunk_previews_line_windows() {
    let temp = tempdir().unwrap();
    let body = (1..=25)
        .map(|n| format!("const v{n} = {n};"))
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(temp.path().join("big.ts"), body).unwrap();

    let windows = run_json(temp.path(), &["chunk", "big.ts", "--json"]);
    let windows = windows.as_array().expect("array");
    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0]["start_line"], 1);
    assert_eq!(windows[0]["end_line"], 20);
    assert_eq!(windows[1]["start_line"], 11);
    assert_eq!(windows[1]["end_line"], 25);
}

#[test]
fn chunk_rejects_overlap_not_below_window() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("a.ts"), "const a = 1;").unwrap();

    analyst(temp.path())
        .args(["chunk", "a.ts", "--window", "5", "--overlap", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overlap"));
}

#[test]
fn chunk_uses_project_config() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(
        root.join(".analyst.toml"),
        "[chunking]\nwindow_lines = 4\noverlap_lines = 2\n",
    )
    .unwrap();
    let body = (1..=6)
        .map(|n| format!("const v{n} = {n};"))
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(root.join("src/six.ts"), body).unwrap();

    let windows = run_json(root, &["chunk", "src/six.ts", "--json"]);
    let spans: Vec<(u64, u64)> = windows
        .as_array()
        .expect("array")
        .iter()
        .map(|w| (w["start_line"].as_u64().unwrap(), w["end_line"].as_u64().unwrap()))
        .collect();
    assert_eq!(spans, vec![(1, 4), (3, 6)]);
}

#[test]
fn chunk_reports_invalid_project_config() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join(".analyst.toml"), "[chunking\n").unwrap();
    fs::write(temp.path().join("a.ts"), "const a = 1;").unwrap();

    analyst(temp.path())
        .args(["chunk", "a.ts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
