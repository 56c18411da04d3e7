#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Urban API entity schemas.
//!
//! These types mirror the JSON payloads the Urban API accepts and returns
//! for physical objects, services and territories. Field names match the
//! API exactly (`snake_case`), so every type round-trips through
//! `serde_json` without renaming.
//!
//! Service types and physical object types are small enumerations owned by
//! the remote system. Both implement [`ReferenceType`] so that bulk upload
//! configuration can be resolved against either list generically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-form JSON properties attached to API entities.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// A remote enumeration entry identified by a numeric id and a unique name.
pub trait ReferenceType {
    /// Numeric identifier assigned by the Urban API.
    fn id(&self) -> i32;

    /// Human-readable unique name, as written in upload configs.
    fn name(&self) -> &str;
}

/// Type of physical object (building, fence, playground, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhysicalObjectType {
    pub physical_object_type_id: i32,
    pub name: String,
}

impl ReferenceType for PhysicalObjectType {
    fn id(&self) -> i32 {
        self.physical_object_type_id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Type of service (school, cafe, pharmacy, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceType {
    pub service_type_id: i32,
    pub name: String,
}

impl ReferenceType for ServiceType {
    fn id(&self) -> i32 {
        self.service_type_id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Type of territory (region, district, municipality, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerritoryType {
    pub territory_type_id: i32,
    pub name: String,
}

/// Data of a physical object to be uploaded to the Urban API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostPhysicalObject {
    /// Object geometry in WGS84.
    pub geometry: geojson::Geometry,
    pub territory_id: i32,
    pub physical_object_type_id: i32,
    /// Explicit centre point. The API computes one when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centre_point: Option<geojson::Geometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

/// Physical object entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalObject {
    pub physical_object_id: i32,
    pub physical_object_type: PhysicalObjectType,
    pub name: Option<String>,
    pub properties: Properties,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Geometry of a physical object within a territory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectGeometry {
    pub object_geometry_id: i32,
    pub territory_id: i32,
    pub address: Option<String>,
    pub geometry: geojson::Geometry,
    pub centre_point: geojson::Geometry,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Service entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub service_id: i32,
    pub service_type: ServiceType,
    pub territory_type: Option<TerritoryType>,
    pub name: Option<String>,
    /// Real capacity of the service (seats, beds, ...).
    pub capacity_real: Option<i32>,
    pub properties: Properties,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Physical object, its geometry and the service located in it, as
/// returned after an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrbanObject {
    pub urban_object_id: i32,
    pub physical_object: PhysicalObject,
    pub object_geometry: ObjectGeometry,
    pub service: Option<Service>,
}

/// Data of a service to be uploaded to the Urban API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostService {
    pub physical_object_id: i32,
    pub object_geometry_id: i32,
    pub service_type_id: i32,
    pub territory_type_id: Option<i32>,
    pub name: Option<String>,
    pub capacity_real: Option<i32>,
    pub properties: Properties,
}

/// Territory without its (potentially large) geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerritoryWithoutGeometry {
    pub territory_id: i32,
    pub territory_type: TerritoryType,
    pub parent_id: Option<i32>,
    pub name: String,
    pub level: i32,
    pub properties: Properties,
    pub admin_center: Option<i32>,
    pub okato_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Paginated list response.
///
/// `prev` and `next` are absolute URLs of the neighboring pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Whether more pages follow this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }
}
