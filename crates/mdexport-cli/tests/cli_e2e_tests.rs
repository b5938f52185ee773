//! CLI end-to-end tests that invoke the compiled `mdexport` binary.
//!
//! Every test points `--config` at a settings file inside its own temporary
//! directory, so the user's real settings are never touched.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use mdexport_test_utils::TestTree;
use predicates::prelude::*;

/// Get a Command for the mdexport binary using `config` as settings file
fn mdexport(config: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mdexport"));
    cmd.arg("--config")
        .arg(config)
        .env_remove("RUST_LOG")
        .env_remove("MDEXPORT_CONFIG")
        .env("NO_COLOR", "1");
    cmd
}

fn config_file(tree: &TestTree) -> PathBuf {
    tree.root().join("settings").join("config.toml")
}

/// Write a settings file with one mapping for `tree` and the given pandoc setup.
fn write_config(tree: &TestTree, pandoc_path: &str, pandoc_args: &[String]) -> PathBuf {
    let path = config_file(tree);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let args = pandoc_args
        .iter()
        .map(|a| format!("{a:?}"))
        .collect::<Vec<_>>()
        .join(", ");
    let content = format!(
        "[pandoc]\npath = {pandoc_path:?}\nargs = [{args}]\n\n[[mappings]]\nsource = {:?}\ntarget = {:?}\n",
        tree.source().display().to_string(),
        tree.target().display().to_string(),
    );
    fs::write(&path, content).unwrap();
    path
}

// ============================================================================
// Help, version, completions
// ============================================================================

#[test]
fn test_help_mentions_commands() {
    let tree = TestTree::new();
    mdexport(&config_file(&tree))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_output() {
    let tree = TestTree::new();
    mdexport(&config_file(&tree))
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions_bash() {
    let tree = TestTree::new();
    mdexport(&config_file(&tree))
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mdexport"));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn test_config_path_prints_override() {
    let tree = TestTree::new();
    let config = config_file(&tree);
    mdexport(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(config.display().to_string()));
}

#[test]
fn test_config_add_rejects_missing_input() {
    let tree = TestTree::new();
    mdexport(&config_file(&tree))
        .args(["config", "add"])
        .arg(tree.root().join("missing"))
        .arg(tree.target())
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_config_add_rejects_output_equal_to_input() {
    let tree = TestTree::new();
    let config = config_file(&tree);

    mdexport(&config)
        .args(["config", "add"])
        .arg(tree.source())
        .arg(tree.source().join("."))
        .assert()
        .failure()
        .stderr(predicate::str::contains("must differ"));

    assert!(!config.exists());
}

#[test]
fn test_config_add_list_remove() {
    let tree = TestTree::new();
    let config = config_file(&tree);

    mdexport(&config)
        .args(["config", "add"])
        .arg(tree.source())
        .arg(tree.target())
        .assert()
        .success()
        .stdout(predicate::str::contains("Added mapping"));

    let stored: toml::Value = toml::from_str(&fs::read_to_string(&config).unwrap()).unwrap();
    let mappings = stored["mappings"].as_array().unwrap();
    assert_eq!(mappings.len(), 1);
    assert!(Path::new(mappings[0]["source"].as_str().unwrap()).is_absolute());

    mdexport(&config)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("source"))
        .stdout(predicate::str::contains("not set (using default \"pandoc\")"));

    mdexport(&config)
        .args(["config", "remove"])
        .arg(tree.source())
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed mapping"));

    mdexport(&config)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(none)"));
}

#[test]
fn test_config_set_pandoc_arguments() {
    let tree = TestTree::new();
    let config = config_file(&tree);

    mdexport(&config)
        .args(["config", "set-pandoc", "--path", "/opt/pandoc", "--", "--toc", "-N"])
        .assert()
        .success();

    let stored: toml::Value = toml::from_str(&fs::read_to_string(&config).unwrap()).unwrap();
    assert_eq!(stored["pandoc"]["path"].as_str(), Some("/opt/pandoc"));
    assert_eq!(stored["pandoc"]["args"].as_array().unwrap().len(), 2);

    mdexport(&config)
        .args(["config", "set-pandoc", "--clear-args"])
        .assert()
        .success();
    let stored: toml::Value = toml::from_str(&fs::read_to_string(&config).unwrap()).unwrap();
    assert!(stored["pandoc"]["args"].as_array().unwrap().is_empty());
    assert_eq!(stored["pandoc"]["path"].as_str(), Some("/opt/pandoc"));
}

#[test]
fn test_config_set_typst_without_changes_fails() {
    let tree = TestTree::new();
    mdexport(&config_file(&tree))
        .args(["config", "set-typst"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to change"));
}

// ============================================================================
// sync
// ============================================================================

#[test]
fn test_sync_without_mappings_warns() {
    let tree = TestTree::new();
    mdexport(&config_file(&tree))
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("No mappings configured"));
}

#[test]
fn test_sync_dry_run_json_leaves_target_untouched() {
    let tree = TestTree::new();
    tree.write_source("intro.md", "# Intro");
    tree.write_source("logo.png", "png");
    let config = write_config(&tree, "/nonexistent/pandoc", &[]);

    let output = mdexport(&config)
        .args(["sync", "--dry-run", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let plans: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let actions = plans[0]["actions"].as_array().unwrap();
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0]["action"], "convert");
    assert_eq!(actions[0]["output_path"], "intro.pdf");
    assert_eq!(actions[1]["action"], "copy");
    assert!(!tree.target().exists());
}

#[test]
fn test_sync_missing_converter_fails_but_copies() {
    let tree = TestTree::new();
    tree.write_source("intro.md", "# Intro");
    tree.write_source("logo.png", "png");
    let config = write_config(&tree, "/nonexistent/pandoc", &[]);

    mdexport(&config)
        .arg("sync")
        .assert()
        .failure()
        .stdout(predicate::str::contains("executable not found"))
        .stderr(predicate::str::contains("1 failed file(s)"));

    tree.assert_target_exists("logo.png");
    tree.assert_target_missing("intro.pdf");
}

#[test]
fn test_sync_missing_source_reports_error() {
    let tree = TestTree::new();
    let config = write_config(&tree, "/nonexistent/pandoc", &[]);
    fs::remove_dir(tree.source()).unwrap();

    mdexport(&config)
        .arg("sync")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Source directory not found"))
        .stderr(predicate::str::contains("1 skipped mapping(s)"));
}

#[test]
fn test_sync_refuses_mapping_onto_its_own_source() {
    let tree = TestTree::new();
    tree.write_source("notes.md", "# Notes");
    let config = config_file(&tree);
    fs::create_dir_all(config.parent().unwrap()).unwrap();
    fs::write(
        &config,
        format!(
            "[[mappings]]\nsource = {:?}\ntarget = {:?}\n",
            tree.source().display().to_string(),
            tree.source().display().to_string(),
        ),
    )
    .unwrap();

    mdexport(&config)
        .args(["sync", "--on-stale", "delete"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("same as the source"));

    assert_eq!(tree.source_files(), vec!["notes.md"]);
}

#[cfg(unix)]
mod with_fake_converter {
    use super::*;
    use mdexport_test_utils::{FakeBehavior, FakeConverter};

    fn setup(tree: &TestTree) -> PathBuf {
        tree.write_source("intro.md", "# Intro");
        tree.write_source("img/logo.png", "png");
        tree.write_target("old.pdf", "%PDF old");
        let fake = FakeConverter::create(&tree.root().join("bin"), "pandoc", FakeBehavior::Succeed);
        write_config(tree, &fake.executable(), &fake.args())
    }

    #[test]
    fn test_sync_without_terminal_keeps_stale_files() {
        let tree = TestTree::new();
        let config = setup(&tree);

        mdexport(&config)
            .arg("sync")
            .assert()
            .success()
            .stdout(predicate::str::contains("converted"))
            .stdout(predicate::str::contains("skipped"))
            .stdout(predicate::str::contains("1 converted, 1 copied, 0 deleted, 1 skipped, 0 failed"));

        assert_eq!(
            tree.target_files(),
            vec!["img/logo.png", "intro.pdf", "old.pdf"]
        );
    }

    #[test]
    fn test_sync_on_stale_delete() {
        let tree = TestTree::new();
        let config = setup(&tree);

        mdexport(&config)
            .args(["sync", "--on-stale", "delete"])
            .assert()
            .success()
            .stdout(predicate::str::contains("deleted"));

        tree.assert_target_missing("old.pdf");
        tree.assert_target_exists("intro.pdf");
    }

    #[test]
    fn test_sync_json_outcomes() {
        let tree = TestTree::new();
        let config = setup(&tree);

        let output = mdexport(&config)
            .args(["sync", "--json", "--on-stale", "skip"])
            .output()
            .unwrap();

        assert!(output.status.success());
        let outcomes: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(outcomes[0]["converted"], 1);
        assert_eq!(outcomes[0]["copied"], 1);
        assert_eq!(outcomes[0]["skipped"], 1);
        assert_eq!(outcomes[0]["status"]["status"], "completed");
    }
}
