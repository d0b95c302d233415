//! End-to-end pipeline runs against a fake packager.
//!
//! The packager is a shell script that copies its input (`$1`) to the
//! path after `-o` (`$3`), so the produced binaries are the exact bytes
//! the real packager would have compiled.

#![cfg(unix)]

use nodepack_bundler::bundler::{
    BuildId, Error, Pipeline, PipelineStage, Settings, SettingsBuilder, steps::template::ENTRY_SNIPPET,
};
use std::fs;
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

const ENTRY: &str = "console.log(\"start\");\n";

const MANIFEST: &str = r#"{
  "name": "server",
  "version": "1.4.0",
  "scripts": { "start": "node bin/www" },
  "dependencies": { "express": "^4.18.2", "ws": "8.13.0" },
  "devDependencies": { "jest": "^29.0.0" }
}"#;

const COPY_PACKAGER: &str = "#!/bin/sh\ncp \"$1\" \"$3\"\n";
const FAILING_PACKAGER: &str = "#!/bin/sh\necho 'pkg: cannot resolve module' >&2\nexit 3\n";
const SETUP_FAILING_PACKAGER: &str = "#!/bin/sh\ncase \"$1\" in\n  *setup.js) echo 'pkg: setup failed' >&2; exit 2 ;;\nesac\ncp \"$1\" \"$3\"\n";

/// Lays out `app/bin/www`, `app/package.json`, a frontend bundle and the
/// packager script.
fn workspace(packager_script: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::create_dir_all(root.join("app/bin")).unwrap();
    fs::write(root.join("app/bin/www"), ENTRY).unwrap();
    fs::write(root.join("app/package.json"), MANIFEST).unwrap();

    fs::create_dir_all(root.join("app/frontend/assets")).unwrap();
    fs::write(root.join("app/frontend/index.html"), "<app-root></app-root>").unwrap();
    fs::write(root.join("app/frontend/assets/main.js"), "bootstrap();").unwrap();

    fs::write(root.join("fakepkg.sh"), packager_script).unwrap();
    temp
}

fn settings(root: &Path) -> Settings {
    SettingsBuilder::new()
        .entry_file(root.join("app/bin/www"))
        .frontend_dir(root.join("app/frontend"))
        .manifest(root.join("app/package.json"))
        .dist_dir(root.join("dist"))
        .packager(format!("sh {}", root.join("fakepkg.sh").display()))
        .skip_install(true)
        .build_id(BuildId::from_millis(1_700_000_000_000))
        .build()
        .unwrap()
}

#[tokio::test]
async fn produces_release_layout_and_archive() {
    let temp = workspace(COPY_PACKAGER);
    let root = temp.path();
    let settings = settings(root);
    let output_dir = settings.output_dir();

    let report = Pipeline::new(settings).run().await.unwrap();

    assert_eq!(report.stages, PipelineStage::SEQUENCE.to_vec());
    assert_eq!(report.install_commands, 0);
    assert_eq!(report.frontend_files, 2);
    assert_eq!(report.dependencies, 2);
    assert_eq!(report.archive_sha256.len(), 64);

    // Entry file is back to its original bytes, the binary saw the patch
    assert_eq!(fs::read_to_string(root.join("app/bin/www")).unwrap(), ENTRY);
    assert_eq!(
        fs::read_to_string(output_dir.join("run")).unwrap(),
        format!("{ENTRY}{ENTRY_SNIPPET}")
    );

    let setup = fs::read_to_string(output_dir.join("setup")).unwrap();
    assert!(setup.contains("executeCommand(\"npm i\")"));
    assert!(!output_dir.join("setup.js").exists());
    assert!(report.setup_cleanup.missing.is_empty());

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output_dir.join("package.json")).unwrap())
            .unwrap();
    assert_eq!(
        manifest,
        serde_json::json!({ "dependencies": { "express": "^4.18.2", "ws": "8.13.0" } })
    );

    let frontend = output_dir.join("frontend/angular/dist/angular");
    assert_eq!(
        fs::read_to_string(frontend.join("assets/main.js")).unwrap(),
        "bootstrap();"
    );

    assert_eq!(report.archive_path, root.join(format!("dist/{}.zip", report.build_id)));
    let archive = fs::File::open(&report.archive_path).unwrap();
    assert_eq!(archive.metadata().unwrap().len(), report.archive_size);

    let mut zip = zip::ZipArchive::new(archive).unwrap();
    let mut run = String::new();
    zip.by_name("run").unwrap().read_to_string(&mut run).unwrap();
    assert!(run.ends_with(ENTRY_SNIPPET));
    assert!(zip.by_name("frontend/angular/dist/angular/index.html").is_ok());
    assert!(zip.by_name("package.json").is_ok());
    assert!(zip.by_name("setup.js").is_err());
}

#[tokio::test]
async fn packager_failure_restores_entry_and_stops() {
    let temp = workspace(FAILING_PACKAGER);
    let root = temp.path();
    let settings = settings(root);
    let output_dir = settings.output_dir();
    let archive_path = settings.archive_path();

    let err = Pipeline::new(settings).run().await.unwrap_err();

    match &err {
        Error::Stage { stage, source } => {
            assert_eq!(*stage, PipelineStage::BinaryBuilt);
            assert!(matches!(**source, Error::CommandExit { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fs::read_to_string(root.join("app/bin/www")).unwrap(), ENTRY);
    assert!(!output_dir.join("frontend").exists());
    assert!(!output_dir.join("package.json").exists());
    assert!(!archive_path.exists());
}

#[tokio::test]
async fn missing_entry_file_fails_before_packaging() {
    let temp = workspace(COPY_PACKAGER);
    let root = temp.path();
    fs::remove_file(root.join("app/bin/www")).unwrap();
    let settings = settings(root);
    let output_dir = settings.output_dir();

    let err = Pipeline::new(settings).run().await.unwrap_err();

    assert!(matches!(
        err,
        Error::Stage {
            stage: PipelineStage::EntryPatched,
            ..
        }
    ));
    assert!(!output_dir.join("run").exists());
}

#[tokio::test]
async fn missing_frontend_leaves_binary_and_restored_entry() {
    let temp = workspace(COPY_PACKAGER);
    let root = temp.path();
    fs::remove_dir_all(root.join("app/frontend")).unwrap();
    let settings = settings(root);
    let output_dir = settings.output_dir();

    let err = Pipeline::new(settings).run().await.unwrap_err();

    assert!(matches!(
        err,
        Error::Stage {
            stage: PipelineStage::AssetsCopied,
            ..
        }
    ));
    assert!(output_dir.join("run").exists());
    assert_eq!(fs::read_to_string(root.join("app/bin/www")).unwrap(), ENTRY);
}

#[tokio::test]
async fn symlinked_frontend_directory_is_archived() {
    let temp = workspace(COPY_PACKAGER);
    let root = temp.path();
    fs::create_dir_all(root.join("app/frontend/real")).unwrap();
    fs::write(root.join("app/frontend/real/chunk.js"), "chunk();").unwrap();
    std::os::unix::fs::symlink("real", root.join("app/frontend/link")).unwrap();

    let report = Pipeline::new(settings(root)).run().await.unwrap();

    assert_eq!(report.stages.last(), Some(&PipelineStage::Done));
    let mut zip = zip::ZipArchive::new(fs::File::open(&report.archive_path).unwrap()).unwrap();
    let mut target = String::new();
    zip.by_name("frontend/angular/dist/angular/link")
        .unwrap()
        .read_to_string(&mut target)
        .unwrap();
    assert_eq!(target, "real");
    assert!(zip.by_name("frontend/angular/dist/angular/real/chunk.js").is_ok());
}

#[tokio::test]
async fn setup_packaging_failure_writes_no_archive() {
    let temp = workspace(SETUP_FAILING_PACKAGER);
    let root = temp.path();
    let settings = settings(root);
    let output_dir = settings.output_dir();
    let archive_path = settings.archive_path();

    let err = Pipeline::new(settings).run().await.unwrap_err();

    match &err {
        Error::Stage { stage, source } => {
            assert_eq!(*stage, PipelineStage::SetupBuilt);
            assert!(matches!(**source, Error::CommandExit { code: 2, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(output_dir.join("run").exists());
    assert!(output_dir.join("package.json").exists());
    assert!(!output_dir.join("setup").exists());
    assert!(!archive_path.exists());
    assert_eq!(fs::read_to_string(root.join("app/bin/www")).unwrap(), ENTRY);
}

#[tokio::test]
async fn unwritable_archive_path_fails_the_last_stage() {
    let temp = workspace(COPY_PACKAGER);
    let root = temp.path();
    let settings = settings(root);
    let output_dir = settings.output_dir();
    // A directory in the archive's place cannot be opened as a file
    fs::create_dir_all(settings.archive_path()).unwrap();

    let err = Pipeline::new(settings).run().await.unwrap_err();

    assert!(matches!(
        err,
        Error::Stage {
            stage: PipelineStage::Archived,
            ..
        }
    ));
    assert!(output_dir.join("setup").exists());
    assert!(!output_dir.join("setup.js").exists());
}
