//! Locations of the Node.js application being packaged.

use serde::Deserialize;
use std::path::PathBuf;

/// Default entry (startup) script of the application.
pub const DEFAULT_ENTRY_FILE: &str = "../app/node/bin/www";

/// Default prebuilt frontend bundle.
pub const DEFAULT_FRONTEND_DIR: &str = "../app/node/frontend/angular/dist/angular";

/// Default location of the frontend bundle inside the output directory.
pub const DEFAULT_FRONTEND_DEST: &str = "frontend/angular/dist/angular";

/// Default application manifest.
pub const DEFAULT_MANIFEST: &str = "../app/node/package.json";

/// Paths of the application sources.
///
/// # Examples
///
/// ```no_run
/// use nodepack_bundler::bundler::AppSettings;
///
/// let app = AppSettings {
///     entry_file: "server/bin/www".into(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Startup script, patched before packaging and restored afterwards.
    pub entry_file: PathBuf,

    /// Prebuilt frontend bundle copied verbatim into the output.
    pub frontend_dir: PathBuf,

    /// Destination of the frontend bundle, relative to the output directory.
    ///
    /// The packaged server resolves its static files from this path.
    pub frontend_dest: PathBuf,

    /// `package.json` whose `dependencies` are shipped next to the binary.
    pub manifest: PathBuf,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            entry_file: DEFAULT_ENTRY_FILE.into(),
            frontend_dir: DEFAULT_FRONTEND_DIR.into(),
            frontend_dest: DEFAULT_FRONTEND_DEST.into(),
            manifest: DEFAULT_MANIFEST.into(),
        }
    }
}
