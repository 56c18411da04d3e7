#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bulk upload configuration resolution.
//!
//! Turns a name-keyed [`UploadConfig`] into an identifier-keyed
//! [`UploadConfigWithIds`] by looking every service type and physical object
//! type name up in the reference lists exported from the Urban API. All
//! unresolvable references are reported together in a single
//! [`ValidationError`].
//!
//! The [`files`] and [`plan`] modules cover the file handling around
//! resolution: reading and writing configs, reading reference lists, and
//! matching a directory of `GeoJSON` files against a resolved config.
//!
//! [`UploadConfig`]: urban_loader_bulk_models::UploadConfig
//! [`UploadConfigWithIds`]: urban_loader_bulk_models::UploadConfigWithIds

pub mod files;
pub mod plan;
pub mod resolve;
pub mod validation;

use std::path::PathBuf;

pub use resolve::{resolve, resolve_physical_objects, resolve_with};
pub use validation::{ValidationError, Violation};

/// Errors that can occur while loading, resolving, or planning bulk uploads.
#[derive(Debug, thiserror::Error)]
pub enum BulkError {
    /// The config references unknown types or lacks required values.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// I/O error on a config, reference list, or data directory.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// TOML parsing failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed.
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension is neither `.toml` nor `.json`.
    #[error("Unsupported config format: {} (expected .toml or .json)", .path.display())]
    UnsupportedFormat {
        /// Offending path.
        path: PathBuf,
    },
}

impl BulkError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
