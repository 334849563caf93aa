//! Configuration integration tests.
//!
//! Each test writes a config file into a temp project, runs the binary there,
//! and checks that the dataset and scoring settings reach the commands that
//! use them.

use assert_cmd::Command;
use predicates::prelude::*;
use rusqlite::Connection;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SEED: &str = include_str!("fixtures/seed.sql");

/// Returns a Command configured to run our binary.
///
/// Environment overrides are cleared so only the files under test apply.
#[allow(deprecated)]
fn cmd() -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    for key in [
        "ROYAL_PIPES_DATABASE",
        "ROYAL_PIPES_ALPHA",
        "ROYAL_PIPES_PRIOR",
        "ROYAL_PIPES_INCLUDE_STOPWORDS",
        "ROYAL_PIPES_TOP_K",
        "ROYAL_PIPES_LOG_LEVEL",
        "ROYAL_PIPES_LOG_PATH",
        "RUST_LOG",
    ] {
        cmd.env_remove(key);
    }
    cmd.env(
        "ROYAL_PIPES_LOG_DIR",
        std::env::temp_dir().join("royal-pipes-test-logs"),
    );
    cmd
}

/// A project directory holding a seeded dataset.
struct Project {
    dir: TempDir,
    db: PathBuf,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("data").join("speeches.db");
        fs::create_dir_all(db.parent().unwrap()).unwrap();
        let conn = Connection::open(&db).unwrap();
        conn.execute_batch(royal_pipes_core::dataset::SCHEMA)
            .unwrap();
        conn.execute_batch(SEED).unwrap();
        Self { dir, db }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn db(&self) -> &str {
        self.db.to_str().unwrap()
    }

    /// Write `.royal-pipes.toml` pointing at the dataset, plus `extra` lines.
    fn write_config(&self, extra: &str) {
        fs::write(
            self.path().join(".royal-pipes.toml"),
            format!("database = {:?}\n{extra}", self.db()),
        )
        .unwrap();
    }

    /// Run `args --json` from `dir` and parse stdout.
    fn json_in(&self, dir: &Path, args: &[&str]) -> Value {
        let output = cmd()
            .arg("-C")
            .arg(dir)
            .args(args)
            .arg("--json")
            .output()
            .expect("failed to run command");
        assert!(
            output.status.success(),
            "command failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("invalid JSON output")
    }

    fn json(&self, args: &[&str]) -> Value {
        self.json_in(self.path(), args)
    }
}

// =============================================================================
// Dataset Location
// =============================================================================

#[test]
fn defaults_without_config_file() {
    let project = Project::new();
    let json = project.json(&["info"]);

    assert!(json["config"]["config_file"].is_null());
    assert_eq!(json["config"]["alpha"], 10.0);
    assert_eq!(json["config"]["prior"], "background");
    assert_eq!(json["config"]["include_stopwords"], false);
    assert_eq!(json["config"]["top_k"], 12);
    assert_ne!(json["dataset"]["path"], project.db());
}

#[test]
fn database_from_config_is_queried() {
    let project = Project::new();
    project.write_config("");

    let json = project.json(&["speeches"]);
    assert_eq!(json["total_speeches"], 5);

    let info = project.json(&["info"]);
    assert_eq!(info["dataset"]["path"], project.db());
    assert_eq!(info["dataset"]["exists"], true);
}

#[test]
fn database_from_parent_config_is_found() {
    let project = Project::new();
    project.write_config("");
    let nested = project.path().join("notes").join("2024");
    fs::create_dir_all(&nested).unwrap();

    let json = project.json_in(&nested, &["word", "danmark"]);
    assert_eq!(json["total_count"], 9);
}

#[test]
fn git_boundary_hides_outer_database() {
    let project = Project::new();
    project.write_config("");
    let repo = project.path().join("repo");
    fs::create_dir_all(repo.join(".git")).unwrap();

    let json = project.json_in(&repo, &["info"]);
    assert!(json["config"]["config_file"].is_null());
    assert_ne!(json["dataset"]["path"], project.db());
}

#[test]
fn missing_configured_database_is_an_error() {
    let project = Project::new();
    let missing = project.path().join("gone.db");
    fs::write(
        project.path().join(".royal-pipes.toml"),
        format!("database = {:?}\n", missing.to_str().unwrap()),
    )
    .unwrap();

    cmd()
        .arg("-C")
        .arg(project.path())
        .arg("speeches")
        .assert()
        .failure()
        .stderr(predicate::str::contains("gone.db"));
    assert!(!missing.exists(), "dataset must never be created");
}

#[test]
fn env_database_beats_config_database() {
    let project = Project::new();
    fs::write(
        project.path().join(".royal-pipes.toml"),
        "database = \"/nowhere/speeches.db\"\n",
    )
    .unwrap();

    let output = cmd()
        .arg("-C")
        .arg(project.path())
        .args(["speeches", "--json"])
        .env("ROYAL_PIPES_DATABASE", &project.db)
        .output()
        .expect("failed to run command");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["total_speeches"], 5);
}

// =============================================================================
// Scoring Settings
// =============================================================================

#[test]
fn top_k_limits_stored_signature_words() {
    let project = Project::new();
    project.write_config("top_k = 1\n");

    let monarchs = project.json(&["monarchs"]);
    assert_eq!(monarchs[1]["monarch"], "Margrethe II");
    assert_eq!(monarchs[1]["signature_words"].as_array().unwrap().len(), 1);

    let flagged = project.json(&["monarchs", "--top", "2"]);
    assert_eq!(flagged[1]["signature_words"].as_array().unwrap().len(), 2);
}

#[test]
fn alpha_and_prior_reach_signature_scoring() {
    let project = Project::new();
    project.write_config("alpha = 2.5\nprior = \"pooled\"\n");

    let json = project.json(&["signatures", "monarch", "Margrethe II"]);
    assert_eq!(json["alpha"], 2.5);
    assert_eq!(json["prior"], "pooled");

    let flagged = project.json(&[
        "signatures",
        "monarch",
        "Margrethe II",
        "--alpha",
        "0.5",
        "--prior",
        "background",
    ]);
    assert_eq!(flagged["alpha"], 0.5);
    assert_eq!(flagged["prior"], "background");
}

#[test]
fn include_stopwords_widens_both_corpora() {
    let project = Project::new();
    project.write_config("include_stopwords = true\n");

    let json = project.json(&["signatures", "monarch", "Margrethe II"]);
    assert_eq!(json["focal_corpus_size"], 31);
    assert_eq!(json["background_corpus_size"], 40);
    assert_eq!(json["vocabulary"], 5);
}

#[test]
fn explicit_config_overrides_discovered() {
    let project = Project::new();
    project.write_config("top_k = 1\n");
    let explicit = project.path().join("wide.toml");
    fs::write(&explicit, "top_k = 30\n").unwrap();

    let output = cmd()
        .arg("-C")
        .arg(project.path())
        .arg("--config")
        .arg(&explicit)
        .args(["info", "--json"])
        .output()
        .expect("failed to run command");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["config"]["top_k"], 30);
    assert_eq!(json["dataset"]["path"], project.db());
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(reported.ends_with("wide.toml"), "{reported}");
}

#[test]
fn env_alpha_overrides_config_file() {
    let project = Project::new();
    project.write_config("alpha = 2.5\n");

    let output = cmd()
        .arg("-C")
        .arg(project.path())
        .args(["signatures", "decade", "2020s", "--json"])
        .env("ROYAL_PIPES_ALPHA", "0.5")
        .output()
        .expect("failed to run command");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["alpha"], 0.5);
}

#[test]
fn yaml_config_sets_scoring_fields() {
    let project = Project::new();
    fs::write(
        project.path().join("royal-pipes.yaml"),
        format!("database: {:?}\ntop_k: 3\nprior: pooled\n", project.db()),
    )
    .unwrap();

    let json = project.json(&["info"]);
    assert_eq!(json["config"]["top_k"], 3);
    assert_eq!(json["config"]["prior"], "pooled");
    assert_eq!(json["dataset"]["exists"], true);
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn invalid_prior_in_config_shows_error() {
    let project = Project::new();
    project.write_config("prior = \"uniform\"\n");

    cmd()
        .arg("-C")
        .arg(project.path())
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn non_numeric_alpha_shows_error() {
    let project = Project::new();
    project.write_config("alpha = \"high\"\n");

    cmd()
        .arg("-C")
        .arg(project.path())
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}
