//! Integration tests for the docshift CLI
//!
//! These tests run the binary against temporary documentation trees

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helper function to create a test CLI command running inside `dir`
#[allow(deprecated)]
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("docshift").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A legacy tree under `docs-legacy/`, the default source root
fn create_test_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let legacy = temp_dir.path().join("docs-legacy");
    write(
        &legacy,
        "guides/intro.mdx",
        "import { Callout } from 'nextra/components'\n\n# Introduction\n\n<Callout type=\"warning\">Back up your keys.</Callout>\n",
    );
    write(&legacy, "drafts/todo.md", "# TODO\n");
    temp_dir
}

#[test]
fn test_help_command() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Migrate Nextra MDX documentation to Starlight"))
        .stdout(predicate::str::contains("--directive"))
        .stdout(predicate::str::contains("--ignore"));
}

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_migrates_default_tree() {
    let project = create_test_project();
    cli(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Summary:"))
        .stdout(predicate::str::contains("Migration complete"));

    let migrated =
        fs::read_to_string(project.path().join("src/content/docs/guides/intro.mdx")).unwrap();
    assert_eq!(
        migrated,
        "---\ntitle: Introduction\n---\n\nimport { Aside } from '@astrojs/starlight/components';\n\n<Aside type=\"caution\">Back up your keys.</Aside>\n"
    );
    assert!(project.path().join("src/content/docs/drafts/todo.md").is_file());
    assert!(project.path().join("docshift.log").is_file());
}

#[test]
fn test_directive_flag_and_ignore_list() {
    let project = create_test_project();
    cli(project.path())
        .args(["--directive", "--ignore", "drafts,node_modules"])
        .assert()
        .success();

    let migrated =
        fs::read_to_string(project.path().join("src/content/docs/guides/intro.mdx")).unwrap();
    assert!(migrated.contains(":::caution\nBack up your keys.\n:::"));
    assert!(!migrated.contains("import"));
    assert!(!project.path().join("src/content/docs/drafts").exists());
}

#[test]
fn test_config_file_and_overrides() {
    let project = create_test_project();
    fs::write(
        project.path().join("docshift.toml"),
        "output = \"site\"\nignore = [\"drafts\"]\nconcurrency = 2\n",
    )
    .unwrap();

    cli(project.path()).assert().success();
    assert!(project.path().join("site/guides/intro.mdx").is_file());
    assert!(!project.path().join("site/drafts").exists());

    cli(project.path())
        .args(["--output", "other", "--ignore", "none"])
        .assert()
        .success();
    assert!(project.path().join("other/drafts/todo.md").is_file());
}

#[test]
fn test_failed_documents_do_not_fail_the_run() {
    let project = create_test_project();
    write(
        &project.path().join("docs-legacy"),
        "broken.mdx",
        "<Tabs>\nnever closed\n",
    );

    cli(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed: 1"))
        .stdout(predicate::str::contains("broken.mdx"));
    assert!(project.path().join("src/content/docs/guides/intro.mdx").is_file());
}

#[test]
fn test_missing_source_exits_with_error() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .args(["--source", "nowhere"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Source not found"));
}

#[test]
fn test_invalid_config_exits_with_error() {
    let project = create_test_project();
    cli(project.path())
        .args(["--concurrency", "0"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("concurrency"));
}

#[test]
fn test_custom_log_file_is_truncated() {
    let project = create_test_project();
    let log = project.path().join("run.log");
    fs::write(&log, "stale line from an earlier run\n").unwrap();

    cli(project.path())
        .args(["--log-file", "run.log"])
        .assert()
        .success();
    let content = fs::read_to_string(&log).unwrap();
    assert!(!content.contains("stale line"));
    assert!(content.contains("Migrating"));
}
