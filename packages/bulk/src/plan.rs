//! Matching a directory of `GeoJSON` files against bulk configs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use urban_loader_bulk_models::{
    PHYSICAL_OBJECT_TYPE_PLACEHOLDER, PhysicalObjectsUploadConfig,
    PhysicalObjectsUploadConfigWithIds, UploadConfig, UploadConfigWithIds, UploadFileConfig,
    UploadFileConfigWithIds,
};

use crate::BulkError;

/// Lists `*.geojson` files directly inside `dir`, sorted by filename.
///
/// # Errors
///
/// Returns [`BulkError::Io`] if the directory cannot be read.
pub fn geojson_files(dir: &Path) -> Result<Vec<PathBuf>, BulkError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| BulkError::io(dir, e))? {
        let path = entry.map_err(|e| BulkError::io(dir, e))?.path();
        let is_geojson = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == "geojson");
        if is_geojson && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(ToString::to_string)
}

/// Builds a config skeleton for every `*.geojson` file in `dir`.
///
/// Entries carry placeholder type names and no capacity, so the result
/// fails resolution until an operator fills it in.
///
/// # Errors
///
/// Returns [`BulkError::Io`] if the directory cannot be read.
pub fn prepare_upload_config(dir: &Path) -> Result<UploadConfig, BulkError> {
    let filenames = geojson_files(dir)?
        .iter()
        .filter_map(|path| file_name(path))
        .map(|name| (name, UploadFileConfig::placeholder()))
        .collect();
    Ok(UploadConfig { filenames })
}

/// Builds a physical objects config skeleton for every `*.geojson` file in
/// `dir`, each mapped to a placeholder type name.
///
/// # Errors
///
/// Returns [`BulkError::Io`] if the directory cannot be read.
pub fn prepare_physical_objects_config(
    dir: &Path,
) -> Result<PhysicalObjectsUploadConfig, BulkError> {
    let filenames = geojson_files(dir)?
        .iter()
        .filter_map(|path| file_name(path))
        .map(|name| (name, PHYSICAL_OBJECT_TYPE_PLACEHOLDER.to_string()))
        .collect();
    Ok(PhysicalObjectsUploadConfig { filenames })
}

/// A file scheduled for upload with its resolved settings.
///
/// `T` is [`UploadFileConfigWithIds`] for services uploads and the physical
/// object type identifier for physical objects uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpload<T> {
    /// File name relative to the data directory.
    pub filename: String,
    /// Full path of the file.
    pub path: PathBuf,
    /// Resolved settings of the file.
    pub config: T,
}

/// Which files of a directory a resolved config covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPlan<T> {
    /// Files with a config entry, in filename order.
    pub uploads: Vec<PlannedUpload<T>>,
    /// Files on disk without a config entry.
    pub skipped: Vec<String>,
    /// Config entries without a file on disk.
    pub missing_files: Vec<String>,
}

fn plan_files<T: Copy>(
    dir: &Path,
    filenames: &BTreeMap<String, T>,
) -> Result<UploadPlan<T>, BulkError> {
    let mut uploads = Vec::new();
    let mut skipped = Vec::new();

    for path in geojson_files(dir)? {
        let Some(filename) = file_name(&path) else {
            log::warn!("Skipping non UTF-8 filename {}", path.display());
            continue;
        };
        match filenames.get(&filename) {
            Some(&config) => uploads.push(PlannedUpload {
                filename,
                path,
                config,
            }),
            None => skipped.push(filename),
        }
    }

    let missing_files: Vec<String> = filenames
        .keys()
        .filter(|name| !uploads.iter().any(|u| &u.filename == *name))
        .cloned()
        .collect();

    if !skipped.is_empty() {
        log::warn!("Skipped some files: {}", skipped.join(", "));
    }
    if !missing_files.is_empty() {
        log::warn!(
            "Configured files not found in {}: {}",
            dir.display(),
            missing_files.join(", ")
        );
    }

    Ok(UploadPlan {
        uploads,
        skipped,
        missing_files,
    })
}

/// Pairs the `*.geojson` files in `dir` with their resolved services config
/// entries.
///
/// # Errors
///
/// Returns [`BulkError::Io`] if the directory cannot be read.
pub fn plan_uploads(
    dir: &Path,
    config: &UploadConfigWithIds,
) -> Result<UploadPlan<UploadFileConfigWithIds>, BulkError> {
    plan_files(dir, &config.filenames)
}

/// Pairs the `*.geojson` files in `dir` with their resolved physical object
/// type identifiers.
///
/// # Errors
///
/// Returns [`BulkError::Io`] if the directory cannot be read.
pub fn plan_physical_object_uploads(
    dir: &Path,
    config: &PhysicalObjectsUploadConfigWithIds,
) -> Result<UploadPlan<i32>, BulkError> {
    plan_files(dir, &config.filenames)
}
