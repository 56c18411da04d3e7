#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bulk upload configuration types.
//!
//! An operator describes a directory of `GeoJSON` files with a config that
//! names, per file, the service type and physical object type of its
//! features. Those names are human-readable; the Urban API wants numeric
//! identifiers. The `*WithIds` types are the resolved form, produced by
//! `urban_loader_bulk` once every name has been checked against the
//! reference lists.
//!
//! All maps are keyed by filename. Name-keyed configs keep the order in
//! which entries appear in the config file; resolved configs are ordered
//! lexicographically.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Sentinel `default_capacity` meaning "not provided".
pub const UNSET_CAPACITY: i32 = -1;

/// Type name written into freshly prepared services configs for the
/// operator to replace.
pub const PLACEHOLDER_TYPE: &str = "___";

/// Type name written into freshly prepared physical objects configs.
pub const PHYSICAL_OBJECT_TYPE_PLACEHOLDER: &str = "(physical object type)";

const fn unset_capacity() -> i32 {
    UNSET_CAPACITY
}

/// Configuration of a single services file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadFileConfig {
    /// Service type name.
    pub service_type: String,
    /// Physical object type name, used when a service has no geometry to
    /// attach to and a new physical object has to be created.
    pub physical_object_type: String,
    /// Capacity assigned to services that do not declare one.
    /// [`UNSET_CAPACITY`] when absent from the file.
    #[serde(default = "unset_capacity")]
    pub default_capacity: i32,
}

impl UploadFileConfig {
    /// Entry with placeholder type names and no capacity.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            service_type: PLACEHOLDER_TYPE.to_string(),
            physical_object_type: PLACEHOLDER_TYPE.to_string(),
            default_capacity: UNSET_CAPACITY,
        }
    }

    /// Whether a real `default_capacity` was provided.
    #[must_use]
    pub const fn has_default_capacity(&self) -> bool {
        self.default_capacity != UNSET_CAPACITY
    }
}

/// Configuration for uploading `GeoJSON` files as services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Filename to file configuration, in config file order.
    pub filenames: IndexMap<String, UploadFileConfig>,
}

impl UploadConfig {
    /// Number of configured files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    /// Whether no files are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }
}

/// Resolved configuration of a single services file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadFileConfigWithIds {
    /// Urban API service type identifier.
    pub service_type_id: i32,
    /// Urban API physical object type identifier.
    pub physical_object_type_id: i32,
    /// Capacity for services without one; never [`UNSET_CAPACITY`].
    pub default_capacity: i32,
}

/// Upload config with names replaced by identifiers and validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfigWithIds {
    /// Filename to resolved file configuration.
    pub filenames: BTreeMap<String, UploadFileConfigWithIds>,
}

impl UploadConfigWithIds {
    /// Resolved entry for `filename`, if configured.
    #[must_use]
    pub fn get(&self, filename: &str) -> Option<&UploadFileConfigWithIds> {
        self.filenames.get(filename)
    }
}

/// Configuration for uploading `GeoJSON` files as bare physical objects:
/// filename to physical object type name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalObjectsUploadConfig {
    /// Filename to physical object type name, in config file order.
    pub filenames: IndexMap<String, String>,
}

/// Physical objects upload config with type names replaced by identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalObjectsUploadConfigWithIds {
    /// Filename to physical object type identifier.
    pub filenames: BTreeMap<String, i32>,
}

/// How resolved entries pick their `default_capacity`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CapacityKeying {
    /// One capacity per service type name. When several files share a
    /// service type, the one listed last in the config wins for all of them.
    #[default]
    ByServiceType,
    /// Every file keeps the capacity it declares.
    ByFilename,
}
