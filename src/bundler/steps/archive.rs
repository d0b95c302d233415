//! Release archive creation.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Deflate level used for release archives (maximum).
pub const COMPRESSION_LEVEL: i64 = 9;

/// Result of [`create_archive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Path of the written archive.
    pub path: PathBuf,
    /// Number of file entries.
    pub files: usize,
    /// Number of directory entries.
    pub directories: usize,
}

/// Zips the *contents* of `source_dir` into `archive_path`.
///
/// Entry names are relative to `source_dir` with `/` separators and are
/// added in sorted order. Unix permissions are carried over so the packaged
/// binaries stay executable. Symlinks are stored as links, never followed.
pub async fn create_archive(source_dir: &Path, archive_path: &Path) -> Result<ArchiveSummary> {
    if !source_dir.is_dir() {
        return Err(Error::GenericError(format!(
            "{source_dir:?} is not a Directory"
        )));
    }

    let source_dir = source_dir.to_path_buf();
    let archive_path = archive_path.to_path_buf();

    let summary = tokio::task::spawn_blocking(move || write_archive(&source_dir, &archive_path))
        .await
        .map_err(|e| Error::GenericError(format!("Archive task panicked: {}", e)))??;

    log::info!(
        "Zip file created successfully: {} ({} files)",
        summary.path.display(),
        summary.files
    );
    Ok(summary)
}

fn write_archive(source_dir: &Path, archive_path: &Path) -> Result<ArchiveSummary> {
    if let Some(parent) = archive_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).fs_context("creating archive directory", parent)?;
    }

    let file = File::create(archive_path).fs_context("creating archive", archive_path)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let base_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL));

    let mut files = 0;
    let mut directories = 0;

    for entry in walkdir::WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry?;
        let rel_path = entry.path().strip_prefix(source_dir)?;
        if rel_path.as_os_str().is_empty() {
            continue;
        }
        let name = zip_entry_name(rel_path);

        if entry.file_type().is_symlink() {
            // Stored as a link; the target may be a directory or dangling
            let target = std::fs::read_link(entry.path())
                .fs_context("reading symlink", entry.path())?
                .to_string_lossy()
                .replace('\\', "/");
            zip.add_symlink(name, target, base_options)?;
            files += 1;
            continue;
        }

        let options = with_permissions(base_options, &entry)?;
        if entry.file_type().is_dir() {
            zip.add_directory(name, options)?;
            directories += 1;
        } else {
            zip.start_file(name, options)?;
            let mut source = File::open(entry.path()).fs_context("opening file", entry.path())?;
            io::copy(&mut source, &mut zip).fs_context("compressing file", entry.path())?;
            files += 1;
        }
    }

    zip.finish()?
        .flush()
        .fs_context("flushing archive", archive_path)?;

    Ok(ArchiveSummary {
        path: archive_path.to_path_buf(),
        files,
        directories,
    })
}

/// Relative path as a zip entry name (always `/`-separated).
fn zip_entry_name(rel_path: &Path) -> String {
    rel_path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(unix)]
fn with_permissions(
    options: SimpleFileOptions,
    entry: &walkdir::DirEntry,
) -> Result<SimpleFileOptions> {
    use std::os::unix::fs::PermissionsExt;
    let metadata = entry.metadata()?;
    Ok(options.unix_permissions(metadata.permissions().mode()))
}

#[cfg(not(unix))]
fn with_permissions(
    options: SimpleFileOptions,
    _entry: &walkdir::DirEntry,
) -> Result<SimpleFileOptions> {
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn build_tree(root: &Path) {
        std::fs::create_dir_all(root.join("frontend/angular/dist/angular/assets")).unwrap();
        std::fs::write(root.join("run"), b"\x7fELF-run").unwrap();
        std::fs::write(root.join("package.json"), "{\n  \"dependencies\": {}\n}\n").unwrap();
        std::fs::write(
            root.join("frontend/angular/dist/angular/index.html"),
            "<html></html>",
        )
        .unwrap();
    }

    #[tokio::test]
    async fn archive_root_is_directory_contents() {
        let dist = tempfile::tempdir().unwrap();
        let out = dist.path().join("1700000000000_ABC");
        build_tree(&out);
        let zip_path = dist.path().join("1700000000000_ABC.zip");

        let summary = create_archive(&out, &zip_path).await.unwrap();

        assert_eq!(summary.files, 3);
        assert_eq!(summary.directories, 5);

        let mut archive = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let names: Vec<String> = archive.file_names().map(String::from).collect();
        assert!(names.iter().all(|n| !n.starts_with("1700000000000_ABC")));
        assert!(names.contains(&"run".to_string()));
        assert!(names.contains(&"frontend/angular/dist/angular/index.html".to_string()));

        let mut index = archive
            .by_name("frontend/angular/dist/angular/index.html")
            .unwrap();
        assert_eq!(index.compression(), CompressionMethod::Deflated);
        let mut text = String::new();
        index.read_to_string(&mut text).unwrap();
        assert_eq!(text, "<html></html>");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn executable_bit_survives() {
        use std::os::unix::fs::PermissionsExt;

        let dist = tempfile::tempdir().unwrap();
        let out = dist.path().join("build");
        build_tree(&out);
        std::fs::set_permissions(out.join("run"), std::fs::Permissions::from_mode(0o755)).unwrap();
        let zip_path = dist.path().join("build.zip");

        create_archive(&out, &zip_path).await.unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let run = archive.by_name("run").unwrap();
        assert_eq!(run.unix_mode().unwrap() & 0o777, 0o755);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinks_are_stored_as_links() {
        let dist = tempfile::tempdir().unwrap();
        let out = dist.path().join("build");
        build_tree(&out);
        let frontend = out.join("frontend/angular/dist/angular");
        std::fs::create_dir_all(frontend.join("real")).unwrap();
        std::fs::write(frontend.join("real/chunk.js"), "chunk();").unwrap();
        std::os::unix::fs::symlink("real", frontend.join("link")).unwrap();
        std::os::unix::fs::symlink("gone.js", frontend.join("dangling")).unwrap();
        let zip_path = dist.path().join("build.zip");

        create_archive(&out, &zip_path).await.unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let names: Vec<String> = archive.file_names().map(String::from).collect();
        assert!(names.contains(&"frontend/angular/dist/angular/real/chunk.js".to_string()));
        assert!(!names.iter().any(|n| n.starts_with("frontend/angular/dist/angular/link/")));

        let mut target = String::new();
        archive
            .by_name("frontend/angular/dist/angular/link")
            .unwrap()
            .read_to_string(&mut target)
            .unwrap();
        assert_eq!(target, "real");

        let mut target = String::new();
        archive
            .by_name("frontend/angular/dist/angular/dangling")
            .unwrap()
            .read_to_string(&mut target)
            .unwrap();
        assert_eq!(target, "gone.js");
    }

    #[tokio::test]
    async fn missing_source_is_an_error() {
        let dist = tempfile::tempdir().unwrap();
        let err = create_archive(&dist.path().join("nope"), &dist.path().join("nope.zip"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("is not a Directory"));
    }
}
