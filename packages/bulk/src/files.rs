//! Reading and writing bulk configs and reference lists.
//!
//! Configs are TOML or JSON, picked by file extension. Reference lists are
//! JSON as exported from the Urban API: either a bare array or a single
//! [`Paginated`] page.
//!
//! [`resolve_upload_config_file`] and [`resolve_physical_objects_config_file`]
//! combine loading and resolution for callers that only hold file paths.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use urban_loader_bulk_models::{
    CapacityKeying, PhysicalObjectsUploadConfig, PhysicalObjectsUploadConfigWithIds,
    UploadConfig, UploadConfigWithIds,
};
use urban_loader_urban_models::{Paginated, PhysicalObjectType, ServiceType};

use crate::BulkError;
use crate::resolve::{resolve_physical_objects, resolve_with};

/// Serialization format of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

impl Format {
    fn of(path: &Path) -> Result<Self, BulkError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => Err(BulkError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

fn read_to_string(path: &Path) -> Result<String, BulkError> {
    fs::read_to_string(path).map_err(|e| BulkError::io(path, e))
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T, BulkError> {
    let format = Format::of(path)?;
    let content = read_to_string(path)?;
    Ok(match format {
        Format::Toml => toml::from_str(&content)?,
        Format::Json => serde_json::from_str(&content)?,
    })
}

fn save<T: Serialize>(path: &Path, value: &T) -> Result<(), BulkError> {
    let content = match Format::of(path)? {
        Format::Toml => toml::to_string(value)?,
        Format::Json => serde_json::to_string_pretty(value)?,
    };
    fs::write(path, content).map_err(|e| BulkError::io(path, e))
}

/// Loads a services upload config.
///
/// # Errors
///
/// Returns [`BulkError`] if the file cannot be read, has an unsupported
/// extension, or does not parse.
pub fn load_upload_config(path: &Path) -> Result<UploadConfig, BulkError> {
    let config: UploadConfig = load(path)?;
    log::info!(
        "Loaded upload config {} ({} files)",
        path.display(),
        config.len()
    );
    Ok(config)
}

/// Writes a services upload config in the format implied by the extension.
///
/// # Errors
///
/// Returns [`BulkError`] if serialization or the write fails.
pub fn save_upload_config(path: &Path, config: &UploadConfig) -> Result<(), BulkError> {
    save(path, config)?;
    log::info!(
        "Saved upload config {} ({} files)",
        path.display(),
        config.len()
    );
    Ok(())
}

/// Loads a physical objects upload config.
///
/// # Errors
///
/// Returns [`BulkError`] if the file cannot be read, has an unsupported
/// extension, or does not parse.
pub fn load_physical_objects_config(path: &Path) -> Result<PhysicalObjectsUploadConfig, BulkError> {
    let config: PhysicalObjectsUploadConfig = load(path)?;
    log::info!(
        "Loaded physical objects config {} ({} files)",
        path.display(),
        config.filenames.len()
    );
    Ok(config)
}

/// Writes a physical objects upload config in the format implied by the
/// extension.
///
/// # Errors
///
/// Returns [`BulkError`] if serialization or the write fails.
pub fn save_physical_objects_config(
    path: &Path,
    config: &PhysicalObjectsUploadConfig,
) -> Result<(), BulkError> {
    save(path, config)?;
    log::info!(
        "Saved physical objects config {} ({} files)",
        path.display(),
        config.filenames.len()
    );
    Ok(())
}

/// A reference list as exported from the API.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ReferenceList<T> {
    Page(Paginated<T>),
    Items(Vec<T>),
}

/// Loads a JSON reference list (service types, physical object types, ...).
///
/// Accepts a bare array or one [`Paginated`] page. Only the given page is
/// read; a page that links to further pages is logged as a warning.
///
/// # Errors
///
/// Returns [`BulkError`] if the file cannot be read or does not parse.
pub fn load_reference_types<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, BulkError> {
    let content = read_to_string(path)?;
    let items = match serde_json::from_str::<ReferenceList<T>>(&content)? {
        ReferenceList::Items(items) => items,
        ReferenceList::Page(page) => {
            if page.has_next() {
                log::warn!(
                    "{} holds {} of {} entries; later pages are not read",
                    path.display(),
                    page.results.len(),
                    page.count
                );
            }
            page.results
        }
    };
    log::debug!("Loaded {} reference entries from {}", items.len(), path.display());
    Ok(items)
}

/// Loads a services config and both reference lists, then resolves the
/// config with the given [`CapacityKeying`].
///
/// # Errors
///
/// Returns [`BulkError::Validation`] if the config references unknown types
/// or lacks capacities, or any loading error from the three files.
pub fn resolve_upload_config_file(
    config: &Path,
    service_types: &Path,
    physical_object_types: &Path,
    keying: CapacityKeying,
) -> Result<UploadConfigWithIds, BulkError> {
    let service_types: Vec<ServiceType> = load_reference_types(service_types)?;
    let physical_object_types: Vec<PhysicalObjectType> =
        load_reference_types(physical_object_types)?;
    let config = load_upload_config(config)?;

    let resolved = resolve_with(&config, &service_types, &physical_object_types, keying)?;
    log::info!("Prepared upload config ({} files)", resolved.filenames.len());
    Ok(resolved)
}

/// Loads a physical objects config and the physical object type reference
/// list, then resolves the config.
///
/// # Errors
///
/// Returns [`BulkError::Validation`] if the config references unknown
/// physical object types, or any loading error from the two files.
pub fn resolve_physical_objects_config_file(
    config: &Path,
    physical_object_types: &Path,
) -> Result<PhysicalObjectsUploadConfigWithIds, BulkError> {
    let physical_object_types: Vec<PhysicalObjectType> =
        load_reference_types(physical_object_types)?;
    let config = load_physical_objects_config(config)?;

    let resolved = resolve_physical_objects(&config, &physical_object_types)?;
    log::info!(
        "Prepared physical objects config ({} files)",
        resolved.filenames.len()
    );
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use urban_loader_bulk_models::UploadFileConfig;
    use urban_loader_urban_models::ServiceType;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_config() -> UploadConfig {
        let mut config = UploadConfig::default();
        config.filenames.insert(
            "cafes.geojson".to_string(),
            UploadFileConfig {
                service_type: "cafe".to_string(),
                physical_object_type: "building".to_string(),
                default_capacity: 30,
            },
        );
        config
            .filenames
            .insert("new.geojson".to_string(), UploadFileConfig::placeholder());
        config
    }

    #[test]
    fn toml_config_survives_save_and_load() {
        let dir = scratch_dir("urban_loader_files_toml");
        let path = dir.join("upload.toml");

        save_upload_config(&path, &sample_config()).unwrap();
        let loaded = load_upload_config(&path).unwrap();
        assert_eq!(loaded, sample_config());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn json_config_survives_save_and_load() {
        let dir = scratch_dir("urban_loader_files_json");
        let path = dir.join("upload.json");

        save_upload_config(&path, &sample_config()).unwrap();
        let loaded = load_upload_config(&path).unwrap();
        assert_eq!(loaded, sample_config());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load_upload_config(Path::new("upload.yaml")).unwrap_err();
        assert!(matches!(err, BulkError::UnsupportedFormat { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = scratch_dir("urban_loader_files_missing");
        let err = load_upload_config(&dir.join("absent.toml")).unwrap_err();
        assert!(matches!(err, BulkError::Io { .. }));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn loads_physical_objects_config() {
        let dir = scratch_dir("urban_loader_files_physical");
        let path = dir.join("objects.toml");
        fs::write(
            &path,
            "[filenames]\n\"houses.geojson\" = \"building\"\n\"stalls.geojson\" = \"kiosk\"\n",
        )
        .unwrap();

        let config = load_physical_objects_config(&path).unwrap();
        assert_eq!(config.filenames["houses.geojson"], "building");
        assert_eq!(config.filenames.len(), 2);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn physical_objects_config_survives_save_and_load() {
        let dir = scratch_dir("urban_loader_files_physical_save");
        let path = dir.join("objects.toml");
        let mut config = PhysicalObjectsUploadConfig::default();
        config
            .filenames
            .insert("walls.geojson".to_string(), "fence".to_string());
        config
            .filenames
            .insert("houses.geojson".to_string(), "building".to_string());

        save_physical_objects_config(&path, &config).unwrap();
        let loaded = load_physical_objects_config(&path).unwrap();

        assert_eq!(loaded, config);
        let names: Vec<_> = loaded.filenames.keys().map(String::as_str).collect();
        assert_eq!(names, ["walls.geojson", "houses.geojson"]);

        let _ = fs::remove_dir_all(&dir);
    }

    fn write_reference_lists(dir: &Path) -> (PathBuf, PathBuf) {
        let service_types = dir.join("service_types.json");
        let physical_object_types = dir.join("physical_object_types.json");
        fs::write(
            &service_types,
            r#"[{"service_type_id": 5, "name": "cafe"}]"#,
        )
        .unwrap();
        fs::write(
            &physical_object_types,
            r#"[{"physical_object_type_id": 7, "name": "building"}]"#,
        )
        .unwrap();
        (service_types, physical_object_types)
    }

    #[test]
    fn resolves_upload_config_file() {
        let dir = scratch_dir("urban_loader_files_resolve_ok");
        let (service_types, physical_object_types) = write_reference_lists(&dir);
        let config = dir.join("upload.toml");
        save_upload_config(&config, &sample_config()).unwrap();
        let mut filled = load_upload_config(&config).unwrap();
        filled.filenames.shift_remove("new.geojson");
        save_upload_config(&config, &filled).unwrap();

        let resolved = resolve_upload_config_file(
            &config,
            &service_types,
            &physical_object_types,
            CapacityKeying::ByServiceType,
        )
        .unwrap();

        let entry = resolved.get("cafes.geojson").unwrap();
        assert_eq!(entry.service_type_id, 5);
        assert_eq!(entry.physical_object_type_id, 7);
        assert_eq!(entry.default_capacity, 30);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn invalid_upload_config_file_is_validation_error() {
        let dir = scratch_dir("urban_loader_files_resolve_invalid");
        let (service_types, physical_object_types) = write_reference_lists(&dir);
        let config = dir.join("upload.json");
        save_upload_config(&config, &sample_config()).unwrap();

        let err = resolve_upload_config_file(
            &config,
            &service_types,
            &physical_object_types,
            CapacityKeying::ByServiceType,
        )
        .unwrap_err();

        assert!(matches!(err, BulkError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "missing service_types: ___; \
             missing physical_object_types: ___; \
             missing some default_capacity: new.geojson"
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn invalid_physical_objects_config_file_is_validation_error() {
        let dir = scratch_dir("urban_loader_files_resolve_objects");
        let (_, physical_object_types) = write_reference_lists(&dir);
        let config = dir.join("objects.json");
        fs::write(
            &config,
            r#"{"filenames": {"houses.geojson": "building", "tents.geojson": "tent"}}"#,
        )
        .unwrap();

        let err = resolve_physical_objects_config_file(&config, &physical_object_types)
            .unwrap_err();

        let BulkError::Validation(validation) = &err else {
            panic!("expected a validation error, got {err:?}");
        };
        assert_eq!(validation.missing_physical_object_types(), ["tent"]);
        assert_eq!(err.to_string(), "missing physical_object_types: tent");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn loads_bare_reference_array() {
        let dir = scratch_dir("urban_loader_files_refs_array");
        let path = dir.join("service_types.json");
        fs::write(
            &path,
            r#"[{"service_type_id": 1, "name": "school"}, {"service_type_id": 5, "name": "cafe"}]"#,
        )
        .unwrap();

        let types: Vec<ServiceType> = load_reference_types(&path).unwrap();
        assert_eq!(types.len(), 2);
        assert_eq!(types[1].service_type_id, 5);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn loads_paginated_reference_page() {
        let dir = scratch_dir("urban_loader_files_refs_page");
        let path = dir.join("service_types.json");
        fs::write(
            &path,
            r#"{"count": 1, "prev": null, "next": null,
                "results": [{"service_type_id": 1, "name": "school"}]}"#,
        )
        .unwrap();

        let types: Vec<ServiceType> = load_reference_types(&path).unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].name, "school");

        let _ = fs::remove_dir_all(&dir);
    }
}
