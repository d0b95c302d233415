//! Frontend bundle and manifest copying.

use crate::bundler::{
    error::{Context, Error, Result},
    settings::Settings,
    utils::fs,
};
use serde_json::{Map, Value};
use std::path::Path;

/// What [`copy_assets`] put into the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedAssets {
    /// Regular files copied from the frontend bundle.
    pub frontend_files: usize,
    /// Number of entries in the shipped `dependencies`.
    pub dependencies: usize,
}

/// Copies the frontend bundle and writes the trimmed manifest.
///
/// Existing files in the output are overwritten; nothing is merged.
pub async fn copy_assets(settings: &Settings) -> Result<CopiedAssets> {
    let frontend_dest = settings.frontend_dest();
    fs::create_dir_all(&frontend_dest).await?;

    let frontend_files = fs::copy_dir(&settings.app().frontend_dir, &frontend_dest)
        .await
        .with_context(|| {
            format!(
                "copying frontend bundle {}",
                settings.app().frontend_dir.display()
            )
        })?;
    log::info!(
        "Frontend folder copied successfully ({} files)",
        frontend_files
    );

    let manifest = write_trimmed_manifest(&settings.app().manifest, &settings.output_manifest_path())
        .await?;
    let dependencies = manifest
        .get("dependencies")
        .and_then(Value::as_object)
        .map_or(0, Map::len);

    Ok(CopiedAssets {
        frontend_files,
        dependencies,
    })
}

/// Reads the manifest at `source`, keeps only `dependencies` and writes the
/// result to `dest` with two-space indentation.
pub async fn write_trimmed_manifest(source: &Path, dest: &Path) -> Result<Value> {
    let raw = fs::read_bytes(source).await?;
    let manifest: Value = serde_json::from_slice(&raw)
        .with_context(|| format!("parsing manifest {}", source.display()))?;

    let trimmed = trim_manifest(&manifest)?;
    if trimmed.get("dependencies").is_none() {
        log::warn!(
            "{} has no \"dependencies\" field, writing an empty manifest",
            source.display()
        );
    }

    let mut text = serde_json::to_string_pretty(&trimmed)?;
    text.push('\n');
    fs::write_file(dest, text).await?;

    log::info!("Wrote trimmed manifest {}", dest.display());
    Ok(trimmed)
}

/// Returns a manifest holding only the `dependencies` field of `manifest`.
pub fn trim_manifest(manifest: &Value) -> Result<Value> {
    let object = manifest.as_object().ok_or_else(|| {
        Error::GenericError("manifest is not a JSON object".to_string())
    })?;

    let mut trimmed = Map::new();
    if let Some(dependencies) = object.get("dependencies") {
        trimmed.insert("dependencies".to_string(), dependencies.clone());
    }
    Ok(Value::Object(trimmed))
}
