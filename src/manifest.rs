//! Property-list manifests carried inside cache bundles.
//!
//! Archives describe themselves in an `Info.plist` at the bundle root;
//! derived-data folders keep the originating workspace path in a lowercase
//! `info.plist`. Missing or malformed required keys make the caller skip
//! the item, they are never fatal to a scan.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use plist::Value;

use crate::version::Version;

/// Metadata required from an `.xcarchive` bundle's `Info.plist`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveManifest {
    pub project_name: String,
    pub bundle_id: String,
    pub version: Version,
    pub build: String,
    pub created: DateTime<Local>,
}

/// Read and validate an archive bundle manifest.
///
/// Every field is required; the short version string must parse as a
/// numeric version. Returns `None` (with a warning) when anything is
/// missing, so the bundle gets skipped rather than misclassified.
pub fn read_archive_manifest(bundle: &Path) -> Option<ArchiveManifest> {
    let manifest_path = bundle.join("Info.plist");

    let root = match Value::from_file(&manifest_path) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(
                path = %manifest_path.display(),
                %err,
                "cannot open archive manifest, skipping bundle"
            );
            return None;
        }
    };

    let dict = root.as_dictionary()?;

    let Some(project_name) = dict.get("Name").and_then(|v| v.as_string()) else {
        tracing::warn!(path = %bundle.display(), "archive manifest has no project name, skipping");
        return None;
    };

    let Some(created) = dict.get("CreationDate").and_then(|v| v.as_date()) else {
        tracing::warn!(path = %bundle.display(), "archive manifest has no creation date, skipping");
        return None;
    };

    let Some(app) = dict
        .get("ApplicationProperties")
        .and_then(|v| v.as_dictionary())
    else {
        tracing::warn!(path = %bundle.display(), "archive manifest has no application properties, skipping");
        return None;
    };

    let Some(bundle_id) = app.get("CFBundleIdentifier").and_then(|v| v.as_string()) else {
        tracing::warn!(path = %bundle.display(), "archive manifest has no bundle identifier, skipping");
        return None;
    };

    let Some(version_string) = app
        .get("CFBundleShortVersionString")
        .and_then(|v| v.as_string())
    else {
        tracing::warn!(path = %bundle.display(), "archive manifest has no version string, skipping");
        return None;
    };

    let Ok(version) = version_string.parse::<Version>() else {
        tracing::warn!(
            path = %bundle.display(),
            version = version_string,
            "archive version string is not a version, skipping"
        );
        return None;
    };

    let Some(build) = app.get("CFBundleVersion").and_then(|v| v.as_string()) else {
        tracing::warn!(path = %bundle.display(), "archive manifest has no build string, skipping");
        return None;
    };

    Some(ArchiveManifest {
        project_name: project_name.to_string(),
        bundle_id: bundle_id.to_string(),
        version,
        build: build.to_string(),
        created: DateTime::<Local>::from(SystemTime::from(created)),
    })
}

/// Best-effort read of the originating workspace path from a derived-data
/// folder's `info.plist`. Absence is normal and not worth a warning.
pub fn read_workspace_path(project_dir: &Path) -> Option<PathBuf> {
    let manifest_path = project_dir.join("info.plist");

    let root = Value::from_file(manifest_path).ok()?;
    let workspace = root
        .as_dictionary()?
        .get("WorkspacePath")?
        .as_string()?
        .to_string();

    Some(PathBuf::from(workspace))
}
