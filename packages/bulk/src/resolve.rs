//! Name-to-identifier resolution of bulk upload configs.
//!
//! Resolution is all-or-nothing: every entry is checked before anything is
//! returned, so a failing config reports all of its unknown type names and
//! unset capacities at once.

use std::collections::BTreeMap;

use urban_loader_bulk_models::{
    CapacityKeying, PhysicalObjectsUploadConfig, PhysicalObjectsUploadConfigWithIds,
    UploadConfig, UploadConfigWithIds, UploadFileConfig, UploadFileConfigWithIds,
};
use urban_loader_urban_models::ReferenceType;

use crate::validation::{ValidationError, ValidationReport};

/// Builds a name -> id lookup. Duplicate names resolve to the last entry.
fn name_index<R: ReferenceType>(types: &[R]) -> BTreeMap<&str, i32> {
    types.iter().map(|t| (t.name(), t.id())).collect()
}

/// Builds a service type name -> capacity lookup from the config entries
/// themselves, visiting files in config file order so the entry listed last
/// wins.
fn capacities_by_service_type(config: &UploadConfig) -> BTreeMap<&str, i32> {
    let mut capacities = BTreeMap::new();
    for (filename, entry) in &config.filenames {
        let service_type = entry.service_type.as_str();
        let capacity = entry.default_capacity;
        if let Some(previous) = capacities
            .insert(service_type, capacity)
            .filter(|&p| p != capacity)
        {
            log::warn!(
                "Service type '{service_type}' has conflicting default_capacity values \
                 ({previous} and {capacity}); {filename} sets {capacity} for every file of this type"
            );
        }
    }
    capacities
}

/// Resolves `config` against the reference lists, keying capacities by
/// service type name ([`CapacityKeying::ByServiceType`]).
///
/// # Errors
///
/// Returns [`ValidationError`] listing every unknown service type, unknown
/// physical object type, and file without a `default_capacity`.
pub fn resolve<S: ReferenceType, P: ReferenceType>(
    config: &UploadConfig,
    service_types: &[S],
    physical_object_types: &[P],
) -> Result<UploadConfigWithIds, ValidationError> {
    resolve_with(
        config,
        service_types,
        physical_object_types,
        CapacityKeying::ByServiceType,
    )
}

/// Resolves `config` against the reference lists with an explicit
/// [`CapacityKeying`].
///
/// The output has exactly the filenames of `config`.
///
/// # Errors
///
/// Returns [`ValidationError`] listing every unknown service type, unknown
/// physical object type, and file without a `default_capacity`.
pub fn resolve_with<S: ReferenceType, P: ReferenceType>(
    config: &UploadConfig,
    service_types: &[S],
    physical_object_types: &[P],
    keying: CapacityKeying,
) -> Result<UploadConfigWithIds, ValidationError> {
    let service_type_ids = name_index(service_types);
    let physical_object_type_ids = name_index(physical_object_types);

    let mut report = ValidationReport::default();
    let mut matched = Vec::with_capacity(config.len());
    for (filename, entry) in &config.filenames {
        let service_type_id = service_type_ids.get(entry.service_type.as_str()).copied();
        let physical_object_type_id = physical_object_type_ids
            .get(entry.physical_object_type.as_str())
            .copied();

        if service_type_id.is_none() {
            report.missing_service_type(&entry.service_type);
        }
        if physical_object_type_id.is_none() {
            report.missing_physical_object_type(&entry.physical_object_type);
        }
        if !entry.has_default_capacity() {
            report.missing_default_capacity(filename);
        }

        // Any entry left out here has already been reported above.
        if let (Some(service_type_id), Some(physical_object_type_id)) =
            (service_type_id, physical_object_type_id)
        {
            matched.push((filename, entry, service_type_id, physical_object_type_id));
        }
    }
    report.finish()?;

    let capacities = match keying {
        CapacityKeying::ByServiceType => Some(capacities_by_service_type(config)),
        CapacityKeying::ByFilename => None,
    };
    let capacity_of = |entry: &UploadFileConfig| {
        capacities
            .as_ref()
            .and_then(|c| c.get(entry.service_type.as_str()).copied())
            .unwrap_or(entry.default_capacity)
    };

    let filenames: BTreeMap<_, _> = matched
        .into_iter()
        .map(|(filename, entry, service_type_id, physical_object_type_id)| {
            (
                filename.clone(),
                UploadFileConfigWithIds {
                    service_type_id,
                    physical_object_type_id,
                    default_capacity: capacity_of(entry),
                },
            )
        })
        .collect();
    debug_assert_eq!(filenames.len(), config.len());

    log::debug!(
        "Resolved {} bulk upload entries ({keying} capacities)",
        filenames.len()
    );

    Ok(UploadConfigWithIds { filenames })
}

/// Resolves a physical objects upload config against the physical object
/// type reference list.
///
/// # Errors
///
/// Returns [`ValidationError`] listing every unknown physical object type.
pub fn resolve_physical_objects<P: ReferenceType>(
    config: &PhysicalObjectsUploadConfig,
    physical_object_types: &[P],
) -> Result<PhysicalObjectsUploadConfigWithIds, ValidationError> {
    let ids = name_index(physical_object_types);

    let mut report = ValidationReport::default();
    let mut filenames = BTreeMap::new();
    for (filename, type_name) in &config.filenames {
        match ids.get(type_name.as_str()) {
            Some(&id) => {
                filenames.insert(filename.clone(), id);
            }
            None => report.missing_physical_object_type(type_name),
        }
    }
    report.finish()?;

    Ok(PhysicalObjectsUploadConfigWithIds { filenames })
}
