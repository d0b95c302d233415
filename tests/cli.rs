//! CLI smoke tests.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn bundler_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("nodepack_bundler");
    for var in [
        "NODEPACK_CONFIG",
        "NODEPACK_ENTRY_FILE",
        "NODEPACK_DIST_DIR",
        "NODEPACK_PACKAGER",
        "NODEPACK_FRONTEND_DIR",
        "NODEPACK_MANIFEST",
        "NODEPACK_TARGET",
        "NODEPACK_COMMAND_TIMEOUT",
        "NODEPACK_SKIP_INSTALL",
        "NODEPACK_ALLOW_STDERR",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn help_lists_flags() {
    bundler_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--entry-file"))
        .stdout(predicate::str::contains("--command-timeout"));
}

#[test]
fn missing_entry_file_exits_with_one() {
    let temp = TempDir::new().unwrap();

    bundler_cmd()
        .current_dir(temp.path())
        .args(["--skip-install", "--entry-file", "nope/www", "--dist-dir", "out"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("patching entry file failed"));
}

#[test]
fn zero_timeout_is_invalid() {
    bundler_cmd()
        .args(["--command-timeout", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid arguments"));
}

#[test]
fn unreadable_config_is_reported() {
    let temp = TempDir::new().unwrap();

    bundler_cmd()
        .current_dir(temp.path())
        .args(["--config", "missing.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot read config file"));
}

#[cfg(unix)]
#[test]
fn full_run_exits_zero_with_archive() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    std::fs::create_dir_all(root.join("app/bin")).unwrap();
    std::fs::create_dir_all(root.join("app/frontend")).unwrap();
    std::fs::write(root.join("app/bin/www"), "console.log(\"start\");\n").unwrap();
    std::fs::write(root.join("app/frontend/index.html"), "<app-root></app-root>").unwrap();
    std::fs::write(
        root.join("app/package.json"),
        r#"{ "name": "server", "dependencies": { "express": "^4.18.2" } }"#,
    )
    .unwrap();
    std::fs::write(root.join("fakepkg.sh"), "#!/bin/sh\ncp \"$1\" \"$3\"\n").unwrap();

    bundler_cmd()
        .current_dir(root)
        .args([
            "--skip-install",
            "--packager",
            "sh fakepkg.sh",
            "--entry-file",
            "app/bin/www",
            "--frontend-dir",
            "app/frontend",
            "--manifest",
            "app/package.json",
            "--dist-dir",
            "dist",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    let archives: Vec<_> = std::fs::read_dir(root.join("dist"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "zip"))
        .collect();
    assert_eq!(archives.len(), 1);

    let build_dir = archives[0].with_extension("");
    assert!(build_dir.join("run").is_file());
    assert!(build_dir.join("setup").is_file());
    assert_eq!(
        std::fs::read_to_string(root.join("app/bin/www")).unwrap(),
        "console.log(\"start\");\n"
    );
}
